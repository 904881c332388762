//! Scour: stream a directory tree through a bounded crawl-and-index pipeline
//! with graceful poison-pill shutdown.
//!
//! One crawler thread walks the tree depth-first and submits each qualifying
//! file into a bounded FIFO queue; one indexer thread drains it. When the
//! crawl finishes, or is cancelled, the crawler enqueues a single shutdown
//! pill behind everything it submitted, so the indexer always drains the
//! remaining work and then stops on its own.

pub mod engine;
pub mod pipeline;
pub mod queue;
pub mod source;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Result alias used by the public scour API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

use crate::pipeline::IndexingService;
use crate::source::{FsSource, should_index};

/// Single entry point: crawl `root` and hand every qualifying file to
/// `index_fn`, honoring `opts`. Blocks until the pipeline has drained.
///
/// For stop control (e.g. wiring up a signal handler), build an
/// [`IndexingService`] directly and keep the
/// [`StopHandle`](crate::pipeline::StopHandle) from the running service:
///
/// ```ignore
/// use scour::{IndexOpts, index_dir};
///
/// let summary = index_dir("/photos".as_ref(), &IndexOpts::default(), |path| {
///     println!("{}", path.display());
///     Ok(())
/// })?;
/// println!("indexed {} files", summary.index.indexed);
/// ```
pub fn index_dir<F>(root: &Path, opts: &IndexOpts, index_fn: F) -> Result<RunSummary>
where
    F: FnMut(PathBuf) -> Result<()> + Send + 'static,
{
    let root = root.canonicalize().context("canonicalize root")?;
    let exclude = opts.exclude.clone();
    IndexingService::new(FsSource::new().follow_links(opts.follow_links), root)
        .capacity(opts.capacity)
        .filter(move |path: &PathBuf| should_index(path, &exclude))
        .index(index_fn)
        .start()
        .await_completion()
}
