//! Command handler for the crawl-and-index run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::engine::Cli;
use crate::pipeline::IndexingService;
use crate::source::{FsSource, should_index};
use crate::types::{IndexOpts, RunSummary};
use crate::utils::setup_logging;

/// Setup logging and create IndexOpts from the CLI.
fn setup_operation(cli: &Cli) -> IndexOpts {
    setup_logging(cli.verbose.unwrap_or(false));
    IndexOpts {
        capacity: cli.capacity,
        follow_links: cli.follow_links.unwrap_or(false),
        exclude: cli.exclude.clone(),
        verbose: cli.verbose.unwrap_or(false),
    }
}

/// Handle the run: wire Ctrl+C to a graceful stop, crawl, index, report.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_operation(cli);
    let root = cli.dir.canonicalize().context("canonicalize directory")?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let total_bytes = Arc::new(AtomicU64::new(0));
    let bytes = Arc::clone(&total_bytes);
    let exclude = opts.exclude.clone();
    let verbose = opts.verbose;

    let service = IndexingService::new(
        FsSource::new().follow_links(opts.follow_links),
        root.clone(),
    )
    .capacity(opts.capacity)
    .filter(move |path: &PathBuf| should_index(path, &exclude))
    .index(move |path: PathBuf| {
        let meta =
            std::fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        bytes.fetch_add(meta.len(), Ordering::Relaxed);
        if verbose {
            log::debug!("indexed {}", path.display());
        }
        Ok(())
    });

    let running = service.start();
    let stop = running.stop_handle();
    let mut interrupted = false;
    ctrlc::set_handler(move || {
        if interrupted {
            warn!("force stop: abandoning queued files");
            stop.force_stop();
        } else {
            info!("stop requested: finishing queued files (Ctrl+C again to abandon)");
            stop.request_stop();
            interrupted = true;
        }
    })
    .context("set Ctrl+C handler")?;

    let summary = running.await_completion()?;
    report(&summary, total_bytes.load(Ordering::Relaxed), &root);
    Ok(())
}

fn report(summary: &RunSummary, bytes: u64, root: &Path) {
    info!(
        "indexed {} files ({} bytes) under {}",
        summary.index.indexed,
        bytes,
        root.display()
    );
    if summary.index.failed > 0 {
        warn!("{} files failed to index", summary.index.failed);
    }
    if summary.crawl.skipped > 0 {
        warn!(
            "skipped {} directories due to permission errors or access issues",
            summary.crawl.skipped
        );
    }
    if summary.crawl.cancelled {
        info!("discovery was stopped early; queued files were still indexed");
    }
}
