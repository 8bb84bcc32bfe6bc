//! Scheduling Engine - SM-2 interval arithmetic and review policies
//!
//! Pure functions only; the store applies the outcomes. Three policies
//! answer the same question ("when next?") for three different review
//! surfaces:
//!
//! - [`QualityScored`]: classic SM-2 driven by a 0-5 quality score
//! - [`DifficultyScaled`]: answer-time 1-4 difficulty rating, growth-scaled
//! - [`PostSessionRecompute`]: end-of-session rating, correctness-blind
//!
//! All three share the ease-factor floor, the lapse pre-reset, and the
//! repetition/streak state machine defined in [`algorithm`].

pub mod algorithm;
mod policy;

pub use algorithm::{
    base_interval_days,
    growth_factor,
    implied_quality,
    is_lapse,
    next_ease,
    recompute_multiplier,
    scaled_interval,
    seed_interval,
    transition,
    // Constants
    LAPSE_EASE_PENALTY,
    LAPSE_INTERVAL_FACTOR,
    LAPSE_MIN_GAP_DAYS,
    MASTERED_MIN_REPETITIONS,
    MASTERED_MIN_STREAK,
    MIN_EASE,
    REMOVAL_HORIZON_DAYS,
};

pub use policy::{
    DifficultyScaled, Lapse, PostSessionRecompute, QualityScored, ScheduleOutcome, ScheduleState,
    SchedulingPolicy,
};
