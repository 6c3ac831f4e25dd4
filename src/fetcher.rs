use std::fs;
use std::path::Path;

use log::info;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use crate::error::Result;
use crate::records::NeatConfig;

/// Where retrieved configs land: one directory above the working directory.
const DOWNLOAD_DIR: &str = "..";

/// Downloads every record marked `to_run` into [`DOWNLOAD_DIR`].
///
/// Ineligible records are skipped before any storage call is made.
/// Downloads run one object at a time; the first failure aborts the run,
/// leaving earlier files on disk and later records untouched.
///
/// # Errors
///
/// Returns an error if an object cannot be fetched or its file cannot be
/// written.
pub async fn retrieve(store: &dyn ObjectStore, records: &[NeatConfig]) -> Result<()> {
    retrieve_into(store, records, Path::new(DOWNLOAD_DIR)).await
}

/// Download pass with the destination directory made explicit so tests can
/// point it at a temp dir.
async fn retrieve_into(
    store: &dyn ObjectStore,
    records: &[NeatConfig],
    dest_dir: &Path,
) -> Result<()> {
    let mut retrieved = 0;

    for record in records.iter().filter(|record| record.to_run) {
        let destination = dest_dir.join(output_filename(record));

        let bytes = store
            .get(&ObjectPath::from(record.key.as_str()))
            .await?
            .bytes()
            .await?;
        fs::write(&destination, &bytes)?;

        info!("Retrieved {} -> {}", record.key, destination.display());
        retrieved += 1;
    }

    if retrieved == 0 {
        info!("No configs marked to run; nothing to retrieve");
    } else {
        info!("Retrieved {retrieved} configs to {}", dest_dir.display());
    }

    Ok(())
}

/// Local filename for a retrieved config: the key's leaf with the first
/// `.yaml` occurrence replaced by `-<last-modified>.yaml`.
///
/// A leaf named `neat.yml` has no `.yaml` to splice into and keeps its
/// original name unchanged.
fn output_filename(record: &NeatConfig) -> String {
    let leaf = record.key.rsplit('/').next().unwrap_or(&record.key);
    leaf.replacen(".yaml", &format!("-{}.yaml", record.last_modified), 1)
}
