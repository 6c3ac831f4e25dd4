mod cli;
mod error;
mod fetcher;
mod output;
mod records;
mod scanner;
mod storage;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use env_logger::Env;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Per-key decisions are reported at info level; RUST_LOG overrides.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting neatscan - NEAT config bucket scanner");
    cli.execute().await?;

    Ok(())
}
