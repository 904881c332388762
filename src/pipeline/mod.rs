//! Pipeline roles and the controller that owns them.

mod crawler;
mod indexer;
mod service;

pub use service::{IndexingService, RunningService, StopHandle};
