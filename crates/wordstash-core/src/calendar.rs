//! Calendar Aggregator
//!
//! Projects non-new records onto a date axis for a fixed look-ahead
//! window, plus an overdue bucket for anything due before today. The
//! projection is fully derived: rebuilt from the store on every change or
//! day rollover, never stored.
//!
//! Drag-initiated moves between day cells go back through the engine's
//! `reschedule`/`remove_from_schedule`; this module only reads.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::record::{RecordState, VocabRecord};

/// Records grouped by local due day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarData {
    /// Day buckets inside the look-ahead window, keyed by local date
    pub days: BTreeMap<NaiveDate, Vec<VocabRecord>>,
    /// Records due before the start of today; never in a day bucket
    pub overdue: Vec<VocabRecord>,
}

impl CalendarData {
    /// Total records across the window and the overdue bucket
    pub fn len(&self) -> usize {
        self.overdue.len() + self.days.values().map(Vec::len).sum::<usize>()
    }

    /// Whether nothing is scheduled in the window
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records due on a given day
    pub fn on(&self, date: NaiveDate) -> &[VocabRecord] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Group records by due day for `look_ahead_days` starting today
///
/// New records are excluded: they have no meaningful due date until a
/// first review schedules them.
pub fn build_calendar(
    records: &[VocabRecord],
    look_ahead_days: u32,
    clock: &dyn Clock,
) -> CalendarData {
    let today = clock.today();
    let today_start = clock.today_start();
    let window_end = today + Duration::days(look_ahead_days as i64);

    let mut data = CalendarData::default();
    for record in records {
        if record.state == RecordState::New {
            continue;
        }
        if record.is_overdue(today_start) {
            data.overdue.push(record.clone());
            continue;
        }
        let due_day = clock.local_date(record.next_review);
        if due_day < window_end {
            data.days.entry(due_day).or_default().push(record.clone());
        }
    }

    data.overdue.sort_by(|a, b| a.next_review.cmp(&b.next_review));
    for bucket in data.days.values_mut() {
        bucket.sort_by(|a, b| a.word.cmp(&b.word));
    }
    data
}

// ============================================================================
// TESTS
// ============================================================================
