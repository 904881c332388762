//! Scour CLI: crawl a directory and index every file through the bounded pipeline.

use anyhow::Result;
use clap::Parser;
use scour::engine::arg_parser::Cli;
use scour::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
