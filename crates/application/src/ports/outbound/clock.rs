//! Clock port - Interface for time operations.

use chrono::{DateTime, Utc};

/// Port for getting the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Get the current Unix timestamp in seconds.
    fn timestamp(&self) -> u64 {
        self.now().timestamp().max(0) as u64
    }
}
