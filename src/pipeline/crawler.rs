//! Producer side: depth-first traversal that feeds the queue and always
//! delivers the shutdown pill on exit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::queue::BoundedQueue;
use crate::source::SourceTree;
use crate::types::{CrawlSummary, PipelineError};

/// Sends the shutdown pill when dropped. Drop runs on every exit path,
/// unwinding included, so the indexer is never left waiting forever.
struct PillGuard<T>(Arc<BoundedQueue<T>>);

impl<T> Drop for PillGuard<T> {
    fn drop(&mut self) {
        self.0.put_shutdown();
    }
}

pub(crate) struct Crawler<S: SourceTree> {
    pub source: S,
    pub root: S::Node,
    pub queue: Arc<BoundedQueue<S::Node>>,
    pub cancel: Arc<AtomicBool>,
    pub filter: Box<dyn Fn(&S::Node) -> bool + Send>,
    pub already_indexed: Box<dyn Fn(&S::Node) -> bool + Send>,
}

impl<S: SourceTree> Crawler<S> {
    /// Run the traversal, then enqueue the shutdown pill. The pill is bound
    /// to a drop guard taken before the first step, so every exit path
    /// (including a panicking collaborator) delivers exactly one pill.
    pub fn run(self) -> CrawlSummary {
        let pill = PillGuard(Arc::clone(&self.queue));
        let mut summary = CrawlSummary::default();
        let outcome = self.crawl(&self.root, &mut summary);
        summary.cancelled = outcome.is_err();
        if summary.cancelled {
            debug!("crawl cancelled after {} submissions", summary.submitted);
        }
        // Traversal is done; the pill goes in behind everything submitted.
        drop(pill);
        summary
    }

    /// Pre-order DFS. An `Err` unwinds the recursion without visiting
    /// anything further; a per-node listing failure is logged and skipped,
    /// and traversal continues with the node's siblings.
    fn crawl(&self, node: &S::Node, summary: &mut CrawlSummary) -> Result<(), PipelineError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(PipelineError::Cancelled);
        }
        let children = match self.source.children(node) {
            Ok(children) => children,
            Err(err) => {
                warn!("skipping unreadable container: {err:#}");
                summary.skipped += 1;
                return Ok(());
            }
        };
        for child in children {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(PipelineError::Cancelled);
            }
            if self.source.is_container(&child) {
                self.crawl(&child, summary)?;
            } else if (self.filter)(&child) && !(self.already_indexed)(&child) {
                self.queue.put(child, &self.cancel)?;
                summary.submitted += 1;
            }
        }
        Ok(())
    }
}
