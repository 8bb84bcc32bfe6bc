//! Vocabulary engine
//!
//! The command surface the UI talks to. Composes the record store, the
//! scheduling policies, and an injected clock: policies compute pure
//! outcomes, the engine applies them to records, anchors due dates to
//! local midnight, and lets the store persist and notify.
//!
//! Operations on unknown ids are no-ops returning `None` so callers can
//! fire-and-forget.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::calendar::{build_calendar, CalendarData};
use crate::clock::{Clock, SystemClock};
use crate::record::{
    Difficulty, HistoryAction, RecordState, VocabRecord, VocabStats, WordInput,
};
use crate::scheduler::{
    algorithm::{base_interval_days, transition, REMOVAL_HORIZON_DAYS},
    DifficultyScaled, PostSessionRecompute, QualityScored, ScheduleOutcome, ScheduleState,
    SchedulingPolicy,
};
use crate::session::{RoundSession, SessionKind};
use crate::store::{RecordStore, Result, SubscriptionId};

/// Spaced-repetition engine over a persisted record store
pub struct VocabEngine {
    store: RecordStore,
    clock: Box<dyn Clock>,
}

impl VocabEngine {
    /// Open an engine on the snapshot at `path` (default platform location
    /// when `None`), using the system clock
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        Self::with_clock(path, SystemClock)
    }

    /// Open an engine with an explicit clock (tests, day-rollover
    /// simulation)
    pub fn with_clock(path: Option<PathBuf>, clock: impl Clock + 'static) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
            clock: Box::new(clock),
        })
    }

    /// The underlying record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // ========== CRUD PASS-THROUGH ==========

    /// Import or re-import a word; dedups by `(source, word, meaning)`
    pub fn upsert(&mut self, input: &WordInput) -> Result<VocabRecord> {
        self.store.upsert(input, self.clock.now())
    }

    /// Get a record by id
    pub fn get(&self, id: &str) -> Option<&VocabRecord> {
        self.store.get(id)
    }

    /// Hard-delete a record
    pub fn delete(&mut self, id: &str) -> bool {
        self.store.delete(id)
    }

    /// Register a change callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Remove a change callback
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ========== REVIEW OPERATIONS ==========

    /// Quality-scored review (classic SM-2, quality 0-5)
    pub fn record_review(
        &mut self,
        id: &str,
        quality: u8,
        was_correct: bool,
    ) -> Option<VocabRecord> {
        let policy = QualityScored {
            quality,
            was_correct,
        };
        self.review_with(id, &policy, json!({ "quality": quality.min(5) }), None)
    }

    /// Difficulty-scaled review (answer-time rating 1-4)
    pub fn record_review_with_difficulty(
        &mut self,
        id: &str,
        difficulty: Difficulty,
        was_correct: bool,
    ) -> Option<VocabRecord> {
        let policy = DifficultyScaled {
            difficulty,
            was_correct,
        };
        self.review_with(
            id,
            &policy,
            json!({ "difficulty": difficulty.rating() }),
            Some(difficulty),
        )
    }

    /// Shared review path: snapshot, apply policy, write back
    fn review_with(
        &mut self,
        id: &str,
        policy: &dyn SchedulingPolicy,
        detail: serde_json::Value,
        difficulty: Option<Difficulty>,
    ) -> Option<VocabRecord> {
        let now = self.clock.now();
        let today_start = self.clock.today_start();

        let outcome = policy.apply(&self.schedule_state(id, now)?);
        tracing::debug!(
            id,
            policy = policy.name(),
            interval = outcome.interval_days,
            "review applied"
        );

        self.store.update_with(id, |record| {
            apply_outcome(record, &outcome, now, today_start);
            let mut detail = detail;
            detail["policy"] = json!(policy.name());
            record.log(now, HistoryAction::Reviewed, Some(detail));
            match outcome.counted_correct {
                Some(true) => {
                    record.times_correct += 1;
                    record.log(now, HistoryAction::Correct, None);
                }
                Some(false) => record.log(now, HistoryAction::Incorrect, None),
                None => {}
            }
            if let Some(difficulty) = difficulty {
                record.difficulty_rating = Some(difficulty);
            }
            record.state = transition(record.repetitions, record.streak);
            record.updated_at = now;
        })
    }

    /// Post-session difficulty recompute (end-of-session rating screen)
    ///
    /// Deliberately ignores in-session correctness: it rescales the
    /// existing interval and promotes the record out of `new` without
    /// counting a review.
    pub fn apply_difficulty_and_recompute_schedule(
        &mut self,
        id: &str,
        difficulty: Difficulty,
    ) -> Option<VocabRecord> {
        let now = self.clock.now();
        let today_start = self.clock.today_start();

        let policy = PostSessionRecompute { difficulty };
        let outcome = policy.apply(&self.schedule_state(id, now)?);

        self.store.update_with(id, |record| {
            record.interval_days = outcome.interval_days;
            record.next_review = today_start + Duration::days(outcome.interval_days);
            record.difficulty_rating = Some(difficulty);
            record.log(
                now,
                HistoryAction::DifficultySet,
                Some(json!({
                    "difficulty": difficulty.rating(),
                    "intervalDays": outcome.interval_days,
                    "policy": policy.name(),
                })),
            );
            if record.state == RecordState::New {
                record.state = transition(record.repetitions, record.streak);
            }
            record.updated_at = now;
        })
    }

    /// Direct difficulty-to-interval mapping; does not touch ease or
    /// repetitions
    pub fn set_difficulty(&mut self, id: &str, difficulty: Difficulty) -> Option<VocabRecord> {
        let now = self.clock.now();
        let today_start = self.clock.today_start();
        let interval = base_interval_days(difficulty);

        self.store.update_with(id, |record| {
            record.interval_days = interval;
            record.next_review = today_start + Duration::days(interval);
            record.difficulty_rating = Some(difficulty);
            record.log(
                now,
                HistoryAction::DifficultySet,
                Some(json!({
                    "difficulty": difficulty.rating(),
                    "intervalDays": interval,
                })),
            );
            if record.state == RecordState::New {
                record.state = transition(record.repetitions, record.streak);
            }
            record.updated_at = now;
        })
    }

    // ========== MANUAL SCHEDULING ==========

    /// Manual override: move the next review to the day `target` falls on,
    /// recomputing the interval from the day delta
    pub fn reschedule(&mut self, id: &str, target: DateTime<Utc>) -> Option<VocabRecord> {
        let now = self.clock.now();
        let target_day = self.clock.day_start(target);
        let delta = (target_day - self.clock.today_start()).num_days();
        let interval = delta.max(1);

        self.store.update_with(id, |record| {
            record.interval_days = interval;
            record.next_review = target_day;
            record.log(
                now,
                HistoryAction::Rescheduled,
                Some(json!({ "to": target_day.to_rfc3339() })),
            );
            record.updated_at = now;
        })
    }

    /// Force an immediate due date, e.g. for a word that went unrated
    pub fn schedule_for_today(&mut self, id: &str, reason: &str) -> Option<VocabRecord> {
        let now = self.clock.now();
        let today_start = self.clock.today_start();

        self.store.update_with(id, |record| {
            record.interval_days = 1;
            record.next_review = today_start;
            record.log(
                now,
                HistoryAction::Rescheduled,
                Some(json!({ "reason": reason, "to": today_start.to_rfc3339() })),
            );
            record.updated_at = now;
        })
    }

    /// Soft, reversible delete: push the due date years out while keeping
    /// the record and its history
    pub fn remove_from_schedule(&mut self, id: &str) -> Option<VocabRecord> {
        let now = self.clock.now();
        let horizon = self.clock.today_start() + Duration::days(REMOVAL_HORIZON_DAYS);

        self.store.update_with(id, |record| {
            record.interval_days = REMOVAL_HORIZON_DAYS;
            record.next_review = horizon;
            record.log(
                now,
                HistoryAction::Rescheduled,
                Some(json!({ "reason": "removed_from_schedule" })),
            );
            record.updated_at = now;
        })
    }

    // ========== ROUND FLAGS ==========

    /// Write the sticky per-round flags onto a record
    pub fn set_round_flags(
        &mut self,
        id: &str,
        wrong_in_current_round: bool,
        needs_next_round: bool,
    ) -> Option<VocabRecord> {
        let now = self.clock.now();
        self.store.update_with(id, |record| {
            record.wrong_in_current_round = wrong_in_current_round;
            record.needs_next_round = needs_next_round;
            record.updated_at = now;
        })
    }

    /// Explicit round reset: clear the sticky flags on every record
    pub fn reset_round_flags(&mut self) -> usize {
        self.store.update_all(|record| {
            let was_set = record.wrong_in_current_round || record.needs_next_round;
            record.wrong_in_current_round = false;
            record.needs_next_round = false;
            was_set
        })
    }

    // ========== QUERIES ==========

    /// Non-new records due now or earlier
    pub fn get_due_cards(&self) -> Vec<VocabRecord> {
        let now = self.clock.now();
        self.filtered(|r| r.state != RecordState::New && r.is_due(now))
    }

    /// Records whose due date fell before the start of today
    pub fn get_overdue_cards(&self) -> Vec<VocabRecord> {
        let today_start = self.clock.today_start();
        self.filtered(|r| r.state != RecordState::New && r.is_overdue(today_start))
    }

    /// Records never reviewed
    pub fn get_new_cards(&self) -> Vec<VocabRecord> {
        self.filtered(|r| r.state == RecordState::New)
    }

    /// Records in a given lifecycle state
    pub fn get_by_state(&self, state: RecordState) -> Vec<VocabRecord> {
        self.filtered(|r| r.state == state)
    }

    fn filtered(&self, keep: impl Fn(&VocabRecord) -> bool) -> Vec<VocabRecord> {
        let mut records: Vec<_> = self
            .store
            .get_all()
            .into_iter()
            .filter(|r| keep(r))
            .collect();
        records.sort_by(|a, b| a.next_review.cmp(&b.next_review));
        records
    }

    /// Calendar projection for a look-ahead window, fully derived from the
    /// store's current contents
    pub fn get_calendar_data(&self, look_ahead_days: u32) -> CalendarData {
        build_calendar(&self.store.get_all(), look_ahead_days, self.clock.as_ref())
    }

    /// Aggregate statistics
    pub fn get_stats(&self) -> VocabStats {
        let now = self.clock.now();
        let today_start = self.clock.today_start();
        let mut stats = VocabStats::default();

        for record in self.store.get_all() {
            stats.total += 1;
            match record.state {
                RecordState::New => stats.new += 1,
                RecordState::Learning => stats.learning += 1,
                RecordState::Reviewing => stats.reviewing += 1,
                RecordState::Mastered => stats.mastered += 1,
            }
            if record.state != RecordState::New {
                if record.is_due(now) {
                    stats.due_today += 1;
                }
                if record.is_overdue(today_start) {
                    stats.overdue += 1;
                }
            }
            stats.total_reviews += record.times_reviewed as i64;
            stats.total_correct += record.times_correct as i64;
            stats.oldest_record = match stats.oldest_record {
                Some(t) if t <= record.created_at => Some(t),
                _ => Some(record.created_at),
            };
            stats.newest_record = match stats.newest_record {
                Some(t) if t >= record.created_at => Some(t),
                _ => Some(record.created_at),
            };
        }
        stats
    }

    // ========== SESSIONS ==========

    /// Start a session over a freshly chosen word set
    pub fn start_custom_session(&self, ids: Vec<String>) -> RoundSession {
        RoundSession::new(ids, SessionKind::Custom)
    }

    /// Start a session over everything currently due
    pub fn start_smart_review_session(&self) -> RoundSession {
        let deck = self.get_due_cards().into_iter().map(|r| r.id).collect();
        RoundSession::new(deck, SessionKind::SmartReview)
    }

    // ========== INTERNAL ==========

    fn schedule_state(&self, id: &str, now: DateTime<Utc>) -> Option<ScheduleState> {
        let record = self.store.get(id)?;
        Some(ScheduleState {
            interval_days: record.interval_days,
            ease_factor: record.ease_factor,
            repetitions: record.repetitions,
            streak: record.streak,
            elapsed_days: record.last_review.map(|last| (now - last).num_days()),
        })
    }
}

impl std::fmt::Debug for VocabEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocabEngine")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Write a policy outcome onto a record: scheduling fields, lapse log,
/// day-anchored due date, review counters
fn apply_outcome(
    record: &mut VocabRecord,
    outcome: &ScheduleOutcome,
    now: DateTime<Utc>,
    today_start: DateTime<Utc>,
) {
    if let Some(lapse) = outcome.lapse {
        record.last_lapse_at = Some(now);
        record.log(
            now,
            HistoryAction::Lapsed,
            Some(json!({ "gapDays": lapse.gap_days })),
        );
    }
    record.interval_days = outcome.interval_days;
    record.ease_factor = outcome.ease_factor;
    record.repetitions = outcome.repetitions;
    record.streak = outcome.streak;
    record.next_review = today_start + Duration::days(outcome.interval_days);
    record.last_review = Some(now);
    record.times_reviewed += 1;
}

// ============================================================================
// TESTS
// ============================================================================
