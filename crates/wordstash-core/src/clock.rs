//! Clock abstraction for day-anchored scheduling
//!
//! Every due date the engine produces is anchored to local midnight, so
//! "due" comparisons stay stable across repeated calls within the same
//! day. The clock is injected rather than read ad hoc, which makes day
//! rollover and calendar bucketing testable without wall-clock waits.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Source of "now" and local-day boundaries.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Local calendar day an instant falls on.
    fn local_date(&self, t: DateTime<Utc>) -> NaiveDate;

    /// Local midnight of the day an instant falls on, as a UTC instant.
    fn day_start(&self, t: DateTime<Utc>) -> DateTime<Utc>;

    /// Local calendar day of `now()`.
    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// Local midnight of today, as a UTC instant.
    fn today_start(&self) -> DateTime<Utc> {
        self.day_start(self.now())
    }
}

/// Production clock backed by the system timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, t: DateTime<Utc>) -> NaiveDate {
        t.with_timezone(&Local).date_naive()
    }

    fn day_start(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local_date(t).and_time(NaiveTime::MIN);
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            // DST gap at local midnight: fall back to the naive boundary
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }
}

/// Manually-driven clock for tests and day-rollover simulation.
///
/// Treats UTC as the local timezone so day boundaries are deterministic.
/// Clones share the same underlying instant, so a handle kept by the test
/// can advance time inside an engine that owns another handle.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Create a clock pinned to the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }

    fn local_date(&self, t: DateTime<Utc>) -> NaiveDate {
        t.date_naive()
    }

    fn day_start(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        Utc.from_utc_datetime(&t.date_naive().and_time(NaiveTime::MIN))
    }
}
