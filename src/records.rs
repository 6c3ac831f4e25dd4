use std::collections::HashSet;

/// A NEAT config discovered in the bucket listing.
///
/// One record is produced per `neat.yaml`/`neat.yml` key. Records start out
/// ineligible; the scanner's eligibility pass flips `to_run` once the full
/// listing has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeatConfig {
    /// Full bucket key of the config (e.g. "00000123/neat.yaml")
    pub key: String,
    /// Object's last-modified stamp, formatted month-day-year-hour-minute-second
    pub last_modified: String,
    /// Whether this config still needs a graph-ML run
    pub to_run: bool,
}

/// Build identifiers that already have a `graph_ml` results directory.
///
/// Collected during the listing walk; membership here is what blocks a
/// config from being marked runnable.
#[derive(Debug, Default)]
pub struct BuildResults(HashSet<String>);

impl BuildResults {
    pub fn insert(&mut self, build: &str) {
        self.0.insert(build.to_string());
    }

    pub fn contains(&self, build: &str) -> bool {
        self.0.contains(build)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
