//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::time::Duration;

/// Queue capacity when the caller doesn't choose one: how many discovered
/// items may wait for the indexer before discovery blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// How often a blocked put/take rechecks its cancel flag. Short enough that
/// stop requests feel immediate, long enough to stay off the CPU.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);
