use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::DEFAULT_QUEUE_CAPACITY;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Streaming crawl-and-index pipeline with graceful shutdown.
#[derive(Clone, Parser)]
#[command(name = "scour")]
#[command(about = "Crawl a directory and index every file; Ctrl+C stops discovery without losing queued work.")]
pub struct Cli {
    /// Directory to crawl. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Queue capacity: how many discovered files may wait for the indexer.
    #[arg(long, short = 'q', default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub capacity: usize,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
