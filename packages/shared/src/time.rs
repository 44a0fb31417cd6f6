//! Time-related utilities with clock abstraction for testability.
//!
//! Two notions of time are used across the workspace:
//!
//! - monotonic milliseconds ([`Clock`]), for rate limits, settle delays and
//!   playback extrapolation
//! - wall-clock Unix milliseconds ([`get_unix_timestamp_millis`]), for
//!   timestamps that are shown to people

use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicU64, Ordering},
};
use std::time::Instant;

use chrono::{TimeZone, Utc};

/// Monotonic clock for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since an arbitrary, fixed origin. Never decreases.
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// System clock implementation (process-wide monotonic origin)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

fn process_origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        process_origin().elapsed().as_millis() as u64
    }
}

/// Manually driven clock for tests.
///
/// Clones share the same reading, so a test can hold one handle and advance
/// it while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a new manual clock starting at the given reading
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute reading. Readings never go backwards.
    pub fn set(&self, millis: u64) {
        self.now.fetch_max(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp in milliseconds
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.to_rfc3339(),
        None => format!("invalid timestamp ({})", timestamp_millis),
    }
}
