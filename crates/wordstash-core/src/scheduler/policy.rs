//! Scheduling policies
//!
//! One trait, three strategies. Each policy takes a snapshot of a record's
//! scheduling fields and returns the next ones; it never touches the
//! record itself, so the store can apply, log, and persist the outcome
//! atomically.

use serde::{Deserialize, Serialize};

use super::algorithm::{
    base_interval_days, growth_factor, implied_quality, is_lapse, next_ease,
    recompute_multiplier, scaled_interval, seed_interval, LAPSE_EASE_PENALTY, MIN_EASE,
};
use crate::record::Difficulty;

// ============================================================================
// POLICY INPUT / OUTPUT
// ============================================================================

/// Snapshot of the scheduling fields a policy reads
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleState {
    /// Current interval in days (0 for a fresh record)
    pub interval_days: i64,
    /// Current ease factor
    pub ease_factor: f64,
    /// Consecutive qualifying reviews
    pub repetitions: i32,
    /// Consecutive correct answers
    pub streak: i32,
    /// Whole days since the last review, if any
    pub elapsed_days: Option<i64>,
}

/// A detected lapse, reported so the store can log it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lapse {
    /// Length of the review gap in days
    pub gap_days: i64,
}

/// Next scheduling fields computed by a policy
#[derive(Debug, Clone, Copy)]
pub struct ScheduleOutcome {
    /// Next interval in days (>= 1)
    pub interval_days: i64,
    /// Next ease factor (>= 1.3)
    pub ease_factor: f64,
    /// Next repetition count
    pub repetitions: i32,
    /// Next streak
    pub streak: i32,
    /// Lapse applied before the normal update, if any
    pub lapse: Option<Lapse>,
    /// Whether the review counts as correct for the answer tally;
    /// `None` for policies that ignore correctness
    pub counted_correct: Option<bool>,
}

/// A strategy answering "when should this word come back?"
pub trait SchedulingPolicy {
    /// Policy name, used in logs and history payloads
    fn name(&self) -> &'static str;

    /// Compute the next scheduling fields from the current ones
    fn apply(&self, state: &ScheduleState) -> ScheduleOutcome;
}

/// Lapse pre-reset shared by the review-time policies: stale progress is
/// partially cleared before the normal update runs on top of it.
fn lapse_reset(state: &ScheduleState) -> (ScheduleState, Option<Lapse>) {
    let Some(elapsed) = state.elapsed_days else {
        return (*state, None);
    };
    if !is_lapse(elapsed, state.interval_days) {
        return (*state, None);
    }
    let reset = ScheduleState {
        repetitions: 0,
        streak: 0,
        ease_factor: (state.ease_factor * LAPSE_EASE_PENALTY).max(MIN_EASE),
        ..*state
    };
    (reset, Some(Lapse { gap_days: elapsed }))
}

// ============================================================================
// QUALITY-SCORED (classic SM-2)
// ============================================================================

/// Classic SM-2 review driven by a 0-5 quality score
#[derive(Debug, Clone, Copy)]
pub struct QualityScored {
    /// Recall quality, 0-5 (clamped)
    pub quality: u8,
    /// Whether the answer itself was correct
    pub was_correct: bool,
}

impl SchedulingPolicy for QualityScored {
    fn name(&self) -> &'static str {
        "quality_scored"
    }

    fn apply(&self, state: &ScheduleState) -> ScheduleOutcome {
        let (state, lapse) = lapse_reset(state);
        let quality = self.quality.min(5);

        let (interval_days, repetitions, streak) = if quality < 3 {
            // Failed recall: restart the repetition ladder
            (1, 0, 0)
        } else {
            let interval = match state.repetitions {
                0 => seed_interval(quality),
                1 => 6,
                _ => scaled_interval(state.interval_days, state.ease_factor),
            };
            (interval, state.repetitions + 1, state.streak + 1)
        };

        ScheduleOutcome {
            interval_days,
            ease_factor: next_ease(state.ease_factor, quality),
            repetitions,
            streak,
            lapse,
            counted_correct: Some(quality >= 3 && self.was_correct),
        }
    }
}

// ============================================================================
// DIFFICULTY-SCALED (answer-time rating)
// ============================================================================

/// Review rated 1-4 at answer time; difficulty picks both the implied
/// quality for the ease update and the interval growth curve
#[derive(Debug, Clone, Copy)]
pub struct DifficultyScaled {
    /// User-chosen difficulty
    pub difficulty: Difficulty,
    /// Whether the answer was correct
    pub was_correct: bool,
}

impl SchedulingPolicy for DifficultyScaled {
    fn name(&self) -> &'static str {
        "difficulty_scaled"
    }

    fn apply(&self, state: &ScheduleState) -> ScheduleOutcome {
        let (state, lapse) = lapse_reset(state);
        let quality = implied_quality(self.difficulty, self.was_correct);

        let (interval_days, repetitions, streak) = if !self.was_correct {
            (1, 0, 0)
        } else if state.repetitions == 0 {
            (
                base_interval_days(self.difficulty),
                state.repetitions + 1,
                state.streak + 1,
            )
        } else {
            (
                scaled_interval(
                    state.interval_days,
                    state.ease_factor * growth_factor(self.difficulty),
                ),
                state.repetitions + 1,
                state.streak + 1,
            )
        };

        ScheduleOutcome {
            interval_days,
            ease_factor: next_ease(state.ease_factor, quality),
            repetitions,
            streak,
            lapse,
            counted_correct: Some(self.was_correct),
        }
    }
}

// ============================================================================
// POST-SESSION RECOMPUTE (end-of-session rating)
// ============================================================================

/// End-of-session rating screen; deliberately ignores in-session
/// correctness and rescales the existing interval
#[derive(Debug, Clone, Copy)]
pub struct PostSessionRecompute {
    /// User-chosen difficulty
    pub difficulty: Difficulty,
}

impl SchedulingPolicy for PostSessionRecompute {
    fn name(&self) -> &'static str {
        "post_session_recompute"
    }

    fn apply(&self, state: &ScheduleState) -> ScheduleOutcome {
        let interval_days = if state.interval_days <= 0 {
            base_interval_days(self.difficulty)
        } else {
            scaled_interval(state.interval_days, recompute_multiplier(self.difficulty))
        };

        ScheduleOutcome {
            interval_days,
            ease_factor: state.ease_factor,
            repetitions: state.repetitions,
            streak: state.streak,
            lapse: None,
            counted_correct: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
