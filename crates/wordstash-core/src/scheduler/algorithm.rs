//! SM-2 arithmetic
//!
//! The raw formulas behind every policy: ease-factor updates, interval
//! seeds, lapse detection, and the lifecycle transition rule.
//!
//! Reference: <https://www.supermemo.com/en/blog/application-of-a-computer-to-improve-the-results-obtained-in-working-with-the-supermemo-method>

use crate::record::{Difficulty, RecordState};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease factor floor; intervals never shrink faster than this allows
pub const MIN_EASE: f64 = 1.3;

/// A gap shorter than this never counts as a lapse
pub const LAPSE_MIN_GAP_DAYS: i64 = 30;

/// A gap of this many scheduled intervals counts as a lapse
pub const LAPSE_INTERVAL_FACTOR: i64 = 3;

/// Ease multiplier applied on a lapse
pub const LAPSE_EASE_PENALTY: f64 = 0.9;

/// Qualifying repetitions required for the mastered state
pub const MASTERED_MIN_REPETITIONS: i32 = 5;

/// Streak required for the mastered state
pub const MASTERED_MIN_STREAK: i32 = 3;

/// Soft-delete horizon: "removed" words are pushed this far out
pub const REMOVAL_HORIZON_DAYS: i64 = 5 * 365;

// ============================================================================
// EASE FACTOR
// ============================================================================

/// SM-2 ease-factor update, recomputed on every review, win or lose
///
/// `ease' = max(1.3, ease + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))`
pub fn next_ease(ease: f64, quality: u8) -> f64 {
    let q = quality.min(5) as f64;
    (ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE)
}

// ============================================================================
// INTERVALS
// ============================================================================

/// Seed interval for the first qualifying repetition of a quality-scored
/// review (quality 3 -> 1 day, 4 -> 3 days, 5 -> 7 days)
pub fn seed_interval(quality: u8) -> i64 {
    match quality {
        0..=3 => 1,
        4 => 3,
        _ => 7,
    }
}

/// Grow a previous interval by a factor, rounded, never below one day
pub fn scaled_interval(prev_days: i64, factor: f64) -> i64 {
    ((prev_days.max(1) as f64) * factor).round().max(1.0) as i64
}

// ============================================================================
// LAPSE DETECTION
// ============================================================================

/// Whether a review gap is long enough to count as a lapse
///
/// The threshold is `max(30 days, 3 x max(1, interval))`: a word reviewed
/// far beyond its scheduled interval has stale progress, but short
/// intervals get a 30-day grace period so everyday procrastination is not
/// punished.
pub fn is_lapse(elapsed_days: i64, interval_days: i64) -> bool {
    let threshold = LAPSE_MIN_GAP_DAYS.max(LAPSE_INTERVAL_FACTOR * interval_days.max(1));
    elapsed_days >= threshold
}

// ============================================================================
// STATE TRANSITIONS
// ============================================================================

/// Lifecycle transition rule, applied after every scheduling operation
///
/// `mastered` requires both the repetition count and the streak, so a
/// record can never jump there straight from `new`.
pub fn transition(repetitions: i32, streak: i32) -> RecordState {
    if repetitions >= MASTERED_MIN_REPETITIONS && streak >= MASTERED_MIN_STREAK {
        RecordState::Mastered
    } else if repetitions >= 1 {
        RecordState::Reviewing
    } else {
        RecordState::Learning
    }
}

// ============================================================================
// DIFFICULTY TABLES
// ============================================================================

/// Base interval for the first qualifying repetition of a difficulty-rated
/// review
pub fn base_interval_days(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Easy => 7,
        Difficulty::Medium => 4,
        Difficulty::Hard => 2,
        Difficulty::VeryHard => 1,
    }
}

/// Growth factor applied on top of the ease factor for subsequent
/// difficulty-rated repetitions
pub fn growth_factor(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.6,
        Difficulty::Medium => 1.35,
        Difficulty::Hard => 1.15,
        Difficulty::VeryHard => 1.0,
    }
}

/// Interval multiplier for the post-session recompute
pub fn recompute_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 2.0,
        Difficulty::Medium => 1.6,
        Difficulty::Hard => 1.25,
        Difficulty::VeryHard => 0.8,
    }
}

/// Quality score implied by a difficulty rating, used to drive the shared
/// ease-factor update
pub fn implied_quality(difficulty: Difficulty, was_correct: bool) -> u8 {
    if !was_correct {
        return 1;
    }
    match difficulty {
        Difficulty::Easy => 5,
        Difficulty::Medium => 4,
        Difficulty::Hard | Difficulty::VeryHard => 3,
    }
}

// ============================================================================
// TESTS
// ============================================================================
