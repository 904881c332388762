//! Pipeline controller: owns the queue and both role threads for one run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use anyhow::Result;

use super::crawler::Crawler;
use super::indexer::Indexer;
use crate::queue::{BoundedQueue, Message};
use crate::source::SourceTree;
use crate::types::{CrawlSummary, IndexSummary, RunSummary};
use crate::utils::config::DEFAULT_QUEUE_CAPACITY;

/// One crawl-and-index run, configured but not yet started.
///
/// A run is single-shot: [`start`](IndexingService::start) consumes the
/// service and returns a [`RunningService`];
/// [`await_completion`](RunningService::await_completion) consumes that.
/// There is no path back to a started state, so double-start is
/// unrepresentable.
pub struct IndexingService<S: SourceTree> {
    source: S,
    root: S::Node,
    capacity: usize,
    filter: Box<dyn Fn(&S::Node) -> bool + Send>,
    already_indexed: Box<dyn Fn(&S::Node) -> bool + Send>,
    index: Box<dyn FnMut(S::Node) -> Result<()> + Send>,
}

impl<S> IndexingService<S>
where
    S: SourceTree + Send + 'static,
{
    /// Service with default collaborators: accept every leaf, nothing is
    /// already indexed, indexing is a no-op.
    pub fn new(source: S, root: S::Node) -> Self {
        IndexingService {
            source,
            root,
            capacity: DEFAULT_QUEUE_CAPACITY,
            filter: Box::new(|_| true),
            already_indexed: Box::new(|_| false),
            index: Box::new(|_| Ok(())),
        }
    }

    /// Queue capacity (default [`DEFAULT_QUEUE_CAPACITY`]).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Leaf filter: only leaves it accepts are submitted.
    pub fn filter(mut self, f: impl Fn(&S::Node) -> bool + Send + 'static) -> Self {
        self.filter = Box::new(f);
        self
    }

    /// Already-indexed predicate: accepted leaves it claims are skipped
    /// (e.g. backed by a previous run's records).
    pub fn already_indexed(mut self, f: impl Fn(&S::Node) -> bool + Send + 'static) -> Self {
        self.already_indexed = Box::new(f);
        self
    }

    /// The index function applied to each item. Failures are logged and
    /// counted, never fatal to the run.
    pub fn index(mut self, f: impl FnMut(S::Node) -> Result<()> + Send + 'static) -> Self {
        self.index = Box::new(f);
        self
    }

    /// Launch the crawler and indexer threads sharing one bounded queue.
    pub fn start(self) -> RunningService<S::Node> {
        let queue = Arc::new(BoundedQueue::with_capacity(self.capacity));
        let cancel_crawl = Arc::new(AtomicBool::new(false));
        let cancel_index = Arc::new(AtomicBool::new(false));

        let crawler = Crawler {
            source: self.source,
            root: self.root,
            queue: Arc::clone(&queue),
            cancel: Arc::clone(&cancel_crawl),
            filter: self.filter,
            already_indexed: self.already_indexed,
        };
        let indexer = Indexer {
            queue: Arc::clone(&queue),
            cancel: Arc::clone(&cancel_index),
            index: self.index,
        };

        let crawl_handle = thread::spawn(move || crawler.run());
        let index_handle = thread::spawn(move || indexer.run());

        RunningService {
            queue,
            cancel_crawl,
            cancel_index,
            crawl_handle,
            index_handle,
        }
    }
}

/// Handle to a running pipeline.
pub struct RunningService<T> {
    queue: Arc<BoundedQueue<T>>,
    cancel_crawl: Arc<AtomicBool>,
    cancel_index: Arc<AtomicBool>,
    crawl_handle: JoinHandle<CrawlSummary>,
    index_handle: JoinHandle<IndexSummary>,
}

impl<T> RunningService<T> {
    /// Graceful stop: cancel discovery only. The indexer keeps draining
    /// queued work until the pill arrives.
    pub fn request_stop(&self) {
        self.cancel_crawl.store(true, Ordering::Relaxed);
    }

    /// Forceful stop: additionally cancels the indexer, abandoning whatever
    /// is still queued.
    pub fn force_stop(&self) {
        self.cancel_crawl.store(true, Ordering::Relaxed);
        self.cancel_index.store(true, Ordering::Relaxed);
    }

    /// Cloneable stop trigger, safe to hand to a signal handler.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            cancel_crawl: Arc::clone(&self.cancel_crawl),
            cancel_index: Arc::clone(&self.cancel_index),
        }
    }

    /// Block until the indexer has exited (pill observed, or force-stopped),
    /// then collect both summaries. Thread panics surface as errors.
    pub fn await_completion(self) -> Result<RunSummary> {
        let index = self
            .index_handle
            .join()
            .map_err(|_| anyhow::anyhow!("indexer thread panicked"))?;
        if !index.saw_shutdown {
            // Forced stop: nobody drains the queue anymore, but the crawler
            // still owes it a pill and may be parked behind leftover items.
            // Drain until the pill lands so the crawler can finish.
            let no_cancel = AtomicBool::new(false);
            loop {
                match self.queue.take(&no_cancel) {
                    Ok(Message::Shutdown) | Err(_) => break,
                    Ok(Message::Item(_)) => {}
                }
            }
        }
        let crawl = self
            .crawl_handle
            .join()
            .map_err(|_| anyhow::anyhow!("crawler thread panicked"))?;
        Ok(RunSummary { crawl, index })
    }
}

/// Stop trigger detached from the running service. Clones share the same
/// underlying flags.
#[derive(Clone)]
pub struct StopHandle {
    cancel_crawl: Arc<AtomicBool>,
    cancel_index: Arc<AtomicBool>,
}

impl StopHandle {
    /// See [`RunningService::request_stop`].
    pub fn request_stop(&self) {
        self.cancel_crawl.store(true, Ordering::Relaxed);
    }

    /// See [`RunningService::force_stop`].
    pub fn force_stop(&self) {
        self.cancel_crawl.store(true, Ordering::Relaxed);
        self.cancel_index.store(true, Ordering::Relaxed);
    }
}
