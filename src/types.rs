//! Public options, run summaries, and the pipeline error type.

use thiserror::Error;

use crate::utils::config::DEFAULT_QUEUE_CAPACITY;

/// Errors surfaced by blocking queue operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The caller's cancel flag was set while the operation was blocked.
    #[error("operation cancelled")]
    Cancelled,
    /// The underlying channel disconnected mid-run.
    #[error("queue closed")]
    Closed,
}

/// Options for [`index_dir`](crate::index_dir) and the CLI.
#[derive(Clone, Debug)]
pub struct IndexOpts {
    /// Queue capacity: how many discovered files may wait for the indexer
    /// before discovery blocks.
    pub capacity: usize,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`).
    pub exclude: Vec<String>,
    /// Verbose output (log each indexed file at debug level).
    pub verbose: bool,
}

impl Default for IndexOpts {
    fn default() -> Self {
        IndexOpts {
            capacity: DEFAULT_QUEUE_CAPACITY,
            follow_links: false,
            exclude: Vec::new(),
            verbose: false,
        }
    }
}

/// What the crawler did before it enqueued the shutdown pill.
#[derive(Clone, Debug, Default)]
pub struct CrawlSummary {
    /// Leaves submitted to the queue.
    pub submitted: usize,
    /// Containers skipped because listing them failed.
    pub skipped: usize,
    /// True when a stop request cut the traversal short.
    pub cancelled: bool,
}

/// What the indexer did before it exited its loop.
#[derive(Clone, Debug, Default)]
pub struct IndexSummary {
    /// Items whose index call returned Ok.
    pub indexed: usize,
    /// Items whose index call failed (logged and skipped).
    pub failed: usize,
    /// True when the loop ended on the shutdown pill; false only after a
    /// forced stop.
    pub saw_shutdown: bool,
}

/// Combined result of one pipeline run, returned by
/// [`RunningService::await_completion`](crate::pipeline::RunningService::await_completion).
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub crawl: CrawlSummary,
    pub index: IndexSummary,
}
