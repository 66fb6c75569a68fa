//! Ledger time source
//!
//! IC ledgers express time as nanoseconds since the unix epoch. Orchestrators
//! read time only through `Clock` so deadline math is deterministic in tests.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Current time in nanoseconds since the unix epoch
    fn now_nanos(&self) -> u64;

    /// `now + window`, saturating
    fn deadline_after(&self, window_nanos: u64) -> u64 {
        self.now_nanos().saturating_add(window_nanos)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Frozen clock for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_nanos(&self) -> u64 {
        self.0
    }
}
