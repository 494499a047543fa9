//! Time adapters.

#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};

use application::ports::outbound::Clock;
use chrono::{DateTime, Utc};
#[cfg(test)]
use chrono::Duration;

/// System clock using the OS time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to, with second precision.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            seconds: AtomicI64::new(start.timestamp()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.seconds.store(at.timestamp(), Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds.load(Ordering::SeqCst), 0)
            .unwrap_or_default()
    }
}
