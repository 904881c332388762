//! Consumer side: drain the queue until the shutdown pill arrives.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::{debug, warn};

use crate::queue::{BoundedQueue, Message};
use crate::types::{IndexSummary, PipelineError};

pub(crate) struct Indexer<T> {
    pub queue: Arc<BoundedQueue<T>>,
    pub cancel: Arc<AtomicBool>,
    pub index: Box<dyn FnMut(T) -> anyhow::Result<()> + Send>,
}

impl<T> Indexer<T> {
    /// Take-and-index loop. Ends on the pill (normal path) or on the
    /// indexer's own cancel flag (forced stop; queued items are abandoned).
    /// A failed index call is logged and counted, never fatal to the loop.
    pub fn run(mut self) -> IndexSummary {
        let mut summary = IndexSummary::default();
        loop {
            match self.queue.take(&self.cancel) {
                Ok(Message::Item(item)) => match (self.index)(item) {
                    Ok(()) => summary.indexed += 1,
                    Err(err) => {
                        warn!("indexing failed: {err:#}");
                        summary.failed += 1;
                    }
                },
                Ok(Message::Shutdown) => {
                    summary.saw_shutdown = true;
                    break;
                }
                Err(PipelineError::Cancelled) => {
                    debug!("indexer force-stopped after {} items", summary.indexed);
                    break;
                }
                Err(PipelineError::Closed) => break,
            }
        }
        summary
    }
}
