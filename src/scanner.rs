use chrono::{DateTime, Utc};
use futures::StreamExt;
use log::{debug, info, warn};
use object_store::ObjectStore;

use crate::error::Result;
use crate::records::{BuildResults, NeatConfig};

/// Directory name marking a build as already having derived results.
const RESULTS_MARKER: &str = "graph_ml";

/// Leaf filenames (lowercased) that identify a NEAT config.
const CONFIG_NAMES: [&str; 2] = ["neat.yaml", "neat.yml"];

/// Longest accepted build directory name.
const MAX_BUILD_ID_LEN: usize = 8;

/// One row of the bucket listing.
#[derive(Debug)]
struct ObjectEntry {
    /// Full slash-delimited object key
    key: String,
    /// Listing timestamp for the object
    last_modified: DateTime<Utc>,
}

/// Walks the full bucket listing and returns one record per NEAT config,
/// with `to_run` set for configs whose build has no `graph_ml` results yet.
///
/// The listing is consumed in delivery order and held in memory before any
/// eligibility decision is made: the build-with-results set has to be
/// complete first, since a results directory may be listed after the config
/// it applies to.
///
/// An empty bucket, or one without any NEAT configs, yields an empty list
/// rather than an error.
///
/// # Errors
///
/// Returns an error if the listing stream fails. Oddly shaped individual
/// keys never abort the scan; they are handled record by record.
pub async fn scan(store: &dyn ObjectStore) -> Result<Vec<NeatConfig>> {
    let entries = list_entries(store).await?;
    Ok(scan_entries(&entries))
}

/// Consumes the store's paginated listing into memory.
async fn list_entries(store: &dyn ObjectStore) -> Result<Vec<ObjectEntry>> {
    let mut entries = Vec::new();
    let mut listing = store.list(None);

    while let Some(meta) = listing.next().await {
        let meta = meta?;
        entries.push(ObjectEntry {
            key: meta.location.to_string(),
            last_modified: meta.last_modified,
        });
    }

    Ok(entries)
}

/// Decision pass over the collected listing.
///
/// First sweep gathers both the NEAT config records and the set of builds
/// that already have results; second sweep marks each record runnable or
/// not and logs the reason.
fn scan_entries(entries: &[ObjectEntry]) -> Vec<NeatConfig> {
    let mut results = BuildResults::default();
    let mut configs = Vec::new();

    for entry in entries {
        if let Some(build) = results_marker_build(&entry.key) {
            debug!("Build {build} has {RESULTS_MARKER} output at {}", entry.key);
            results.insert(build);
        }

        if is_neat_config(&entry.key) {
            configs.push(NeatConfig {
                key: entry.key.clone(),
                last_modified: format_last_modified(entry.last_modified),
                to_run: false,
            });
        }
    }

    info!("Found {} NEAT configs", configs.len());
    if !results.is_empty() {
        debug!("{} builds already have {RESULTS_MARKER} results", results.len());
    }

    for config in &mut configs {
        match parent_segment(&config.key) {
            Some(build) if !is_valid_build_id(build) => {
                warn!(
                    "{}: {build:?} does not look like a build directory (expected up to {MAX_BUILD_ID_LEN} digits)",
                    config.key
                );
            }
            Some(build) if results.contains(build) => {
                info!(
                    "Build {build} already has {RESULTS_MARKER} results; skipping {}",
                    config.key
                );
            }
            Some(build) => {
                info!(
                    "Build {build} has no {RESULTS_MARKER} results yet; marking {}",
                    config.key
                );
                config.to_run = true;
            }
            None => {
                warn!("{}: key has no parent build directory", config.key);
            }
        }
    }

    configs
}

/// Build id owning a results directory, when `key` is shaped
/// `.../<build>/graph_ml/<leaf>`.
///
/// Purely positional: the marker must sit immediately before the leaf and
/// the build id is taken three segments from the end. Keys too shallow to
/// index that far are skipped, not errors.
fn results_marker_build(key: &str) -> Option<&str> {
    let mut segments = key.rsplit('/');
    let _leaf = segments.next();
    if segments.next()? != RESULTS_MARKER {
        return None;
    }
    segments.next()
}

/// True when the key's leaf is a NEAT config filename (case-insensitive).
fn is_neat_config(key: &str) -> bool {
    let leaf = key.rsplit('/').next().unwrap_or(key);
    CONFIG_NAMES.contains(&leaf.to_ascii_lowercase().as_str())
}

/// Segment immediately preceding the leaf: the would-be build directory.
fn parent_segment(key: &str) -> Option<&str> {
    let mut segments = key.rsplit('/');
    let _leaf = segments.next();
    segments.next()
}

/// Accepted build directory format: digits only, at most 8 characters.
fn is_valid_build_id(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() <= MAX_BUILD_ID_LEN
        && segment.chars().all(|c| c.is_ascii_digit())
}

/// Formats a listing timestamp the way retrieved filenames carry it:
/// `01-02-2023-10-00-00` for 2023-01-02T10:00:00Z.
fn format_last_modified(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%m-%d-%Y-%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::path::Path;
    use object_store::PutPayload;

    fn entry(key: &str, timestamp: &str) -> ObjectEntry {
        ObjectEntry {
            key: key.to_string(),
            last_modified: timestamp.parse().unwrap(),
        }
    }

    #[test]
    fn test_config_without_results_is_marked_runnable() {
        let entries = vec![entry("00000001/neat.yaml", "2023-01-02T10:00:00Z")];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "00000001/neat.yaml");
        assert_eq!(records[0].last_modified, "01-02-2023-10-00-00");
        assert!(records[0].to_run);
    }

    #[test]
    fn test_existing_results_block_the_run() {
        let entries = vec![
            entry("00000001/neat.yaml", "2023-01-02T10:00:00Z"),
            entry("00000001/graph_ml/out.csv", "2023-01-03T08:30:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(!records[0].to_run);
    }

    #[test]
    fn test_non_numeric_build_directory_stays_ineligible() {
        let entries = vec![entry("experiments/neat.yaml", "2023-01-02T10:00:00Z")];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(!records[0].to_run);
    }

    #[test]
    fn test_empty_listing_yields_no_records() {
        let records = scan_entries(&[]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_nine_digit_build_id_is_rejected() {
        let entries = vec![entry("123456789/neat.yaml", "2023-01-02T10:00:00Z")];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(!records[0].to_run);
    }

    #[test]
    fn test_leaf_match_is_case_insensitive() {
        let entries = vec![
            entry("00000001/NEAT.YAML", "2023-01-02T10:00:00Z"),
            entry("00000002/Neat.Yml", "2023-01-02T10:00:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.to_run));
    }

    #[test]
    fn test_non_config_keys_produce_no_records() {
        let entries = vec![
            entry("00000001/merged-kg.tar.gz", "2023-01-02T10:00:00Z"),
            entry("00000001/stats/neat_stats.yaml", "2023-01-02T10:00:00Z"),
            entry("README.md", "2023-01-02T10:00:00Z"),
        ];

        assert!(scan_entries(&entries).is_empty());
    }

    #[test]
    fn test_root_level_config_has_no_build_directory() {
        let entries = vec![entry("neat.yaml", "2023-01-02T10:00:00Z")];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(!records[0].to_run);
    }

    #[test]
    fn test_shallow_results_marker_is_skipped() {
        // graph_ml sits before the leaf but there is no third segment to
        // name a build, so nothing is blocked.
        let entries = vec![
            entry("graph_ml/out.csv", "2023-01-02T10:00:00Z"),
            entry("00000001/neat.yaml", "2023-01-02T10:00:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(records[0].to_run);
    }

    #[test]
    fn test_marker_must_immediately_precede_the_leaf() {
        let entries = vec![
            entry("00000001/graph_ml/nested/out.csv", "2023-01-02T10:00:00Z"),
            entry("00000001/neat.yaml", "2023-01-02T10:00:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(records[0].to_run, "nested marker must not count as results");
    }

    #[test]
    fn test_marker_build_is_taken_three_from_the_end() {
        let entries = vec![
            entry("kg-obo/00000001/graph_ml/out.csv", "2023-01-02T10:00:00Z"),
            entry("kg-obo/00000001/neat.yaml", "2023-01-02T10:00:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(!records[0].to_run);
    }

    #[test]
    fn test_results_for_another_build_do_not_block() {
        let entries = vec![
            entry("00000002/graph_ml/out.csv", "2023-01-02T10:00:00Z"),
            entry("00000001/neat.yaml", "2023-01-02T10:00:00Z"),
        ];

        let records = scan_entries(&entries);

        assert_eq!(records.len(), 1);
        assert!(records[0].to_run);
    }

    #[test]
    fn test_decision_pass_is_idempotent() {
        let entries = vec![
            entry("00000001/neat.yaml", "2023-01-02T10:00:00Z"),
            entry("00000001/graph_ml/out.csv", "2023-01-03T08:30:00Z"),
            entry("00000002/neat.yml", "2023-02-10T23:59:59Z"),
            entry("experiments/neat.yaml", "2023-03-01T00:00:00Z"),
        ];

        assert_eq!(scan_entries(&entries), scan_entries(&entries));
    }

    #[test]
    fn test_results_marker_build_extraction() {
        assert_eq!(
            results_marker_build("00000001/graph_ml/out.csv"),
            Some("00000001")
        );
        assert_eq!(
            results_marker_build("kg-obo/00000001/graph_ml/edges.tsv"),
            Some("00000001")
        );
        assert_eq!(results_marker_build("graph_ml/out.csv"), None);
        assert_eq!(results_marker_build("graph_ml"), None);
        assert_eq!(results_marker_build("00000001/graph_ml/a/b.csv"), None);
        assert_eq!(results_marker_build("00000001/neat.yaml"), None);
    }

    #[test]
    fn test_parent_segment_extraction() {
        assert_eq!(parent_segment("00000001/neat.yaml"), Some("00000001"));
        assert_eq!(parent_segment("a/b/neat.yaml"), Some("b"));
        assert_eq!(parent_segment("/neat.yaml"), Some(""));
        assert_eq!(parent_segment("neat.yaml"), None);
    }

    #[test]
    fn test_build_id_validation() {
        assert!(is_valid_build_id("00000001"));
        assert!(is_valid_build_id("1"));
        assert!(is_valid_build_id("12345678"));

        assert!(!is_valid_build_id("123456789"));
        assert!(!is_valid_build_id("experiments"));
        assert!(!is_valid_build_id("1234567a"));
        assert!(!is_valid_build_id(""));
    }

    #[test]
    fn test_last_modified_format() {
        assert_eq!(
            format_last_modified("2023-01-02T10:00:00Z".parse().unwrap()),
            "01-02-2023-10-00-00"
        );
        assert_eq!(
            format_last_modified("1999-12-31T23:59:59Z".parse().unwrap()),
            "12-31-1999-23-59-59"
        );
    }

    #[tokio::test]
    async fn test_scan_walks_the_store_listing() {
        let store = InMemory::new();
        for key in [
            "00000001/neat.yaml",
            "00000002/neat.yaml",
            "00000002/graph_ml/out.csv",
            "00000003/notes.txt",
        ] {
            store
                .put(&Path::from(key), PutPayload::from_static(b"name: test"))
                .await
                .unwrap();
        }

        let records = scan(&store).await.unwrap();

        assert_eq!(records.len(), 2);
        let pending = records.iter().find(|r| r.key == "00000001/neat.yaml").unwrap();
        let done = records.iter().find(|r| r.key == "00000002/neat.yaml").unwrap();
        assert!(pending.to_run);
        assert!(!done.to_run);
    }

    #[tokio::test]
    async fn test_scan_of_empty_store_returns_no_records() {
        let store = InMemory::new();
        let records = scan(&store).await.unwrap();
        assert!(records.is_empty());
    }
}
