use anyhow::Result;
use clap::Parser;
use log::info;

use crate::fetcher::retrieve;
use crate::output::{print_summary, PhaseProgress};
use crate::scanner::scan;
use crate::storage::bucket_store;

#[derive(Parser)]
#[command(name = "neatscan")]
#[command(author, version, about = "NEAT config bucket scanner", long_about = None)]
pub struct Cli {
    /// Name of the S3 bucket to scan for NEAT configs
    #[arg(long)]
    bucket: String,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        info!("Searching {} for NEAT configs", self.bucket);

        let store = bucket_store(&self.bucket)?;

        let progress = PhaseProgress::start_scan(&self.bucket);
        let records = scan(store.as_ref()).await?;
        progress.finish_scan(records.len());

        print_summary(&records);

        if records.is_empty() {
            info!("No NEAT configs in {}; nothing to do", self.bucket);
            return Ok(());
        }

        let eligible = records.iter().filter(|record| record.to_run).count();

        let progress = PhaseProgress::start_fetch(eligible);
        retrieve(store.as_ref(), &records).await?;
        progress.finish_fetch();

        Ok(())
    }
}
