//! # Wordstash Core
//!
//! Spaced-repetition engine for a personal vocabulary trainer:
//!
//! - **SM-2 scheduling**: ease-factor/interval arithmetic with a 1.3 ease
//!   floor and lapse handling for long review gaps
//! - **Three review policies** behind one trait: quality-scored (0-5),
//!   difficulty-scaled (1-4 at answer time), and a correctness-blind
//!   post-session recompute
//! - **Round sessions**: wrong once in a round means guaranteed
//!   re-exposure in the next round
//! - **Day-anchored due dates**: every due date is local midnight plus
//!   the interval, so "due" is stable across a whole day
//! - **Deterministic identity**: UUID v5 over `(source, word, meaning)`
//!   collapses repeated imports to one record
//! - **Derived calendar**: date-bucketed projection with an overdue
//!   bucket, rebuilt from the store on every change
//!
//! Import parsing, translation lookups, and rendering live outside this
//! crate; it consumes resolved word data and emits scheduling decisions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wordstash_core::{Difficulty, VocabEngine, WordInput};
//!
//! # fn main() -> wordstash_core::Result<()> {
//! // Open the engine on the default platform snapshot location
//! let mut engine = VocabEngine::open(None)?;
//!
//! // Import a word (repeated imports dedup to one record)
//! let mut input = WordInput::new("ephemeral", "lasting a very short time");
//! input.source = Some("deck.csv".to_string());
//! let record = engine.upsert(&input)?;
//!
//! // Review it: quality 4 of 5, answered correctly
//! let _ = engine.record_review(&record.id, 4, true);
//!
//! // Run a session over everything due
//! let mut session = engine.start_smart_review_session();
//! while let Some(id) = session.current().map(str::to_string) {
//!     session.pass();
//!     let _ = engine.apply_difficulty_and_recompute_schedule(&id, Difficulty::Medium);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod calendar;
pub mod clock;
pub mod record;
pub mod scheduler;
pub mod session;
pub mod store;

mod engine;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Record types
pub use record::{
    record_id, Difficulty, HistoryAction, HistoryEntry, RecordState, VocabRecord, VocabStats,
    WordInput,
};

// Scheduling policies
pub use scheduler::{
    DifficultyScaled, Lapse, PostSessionRecompute, QualityScored, ScheduleOutcome, ScheduleState,
    SchedulingPolicy, MIN_EASE,
};

// Engine and store
pub use engine::VocabEngine;
pub use store::{RecordStore, Result, StoreError, SubscriptionId};

// Sessions
pub use session::{RoundSession, SessionKind};

// Calendar
pub use calendar::{build_calendar, CalendarData};

// Clock
pub use clock::{Clock, FixedClock, SystemClock};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CalendarData, Clock, Difficulty, RecordState, Result, RoundSession, SessionKind,
        StoreError, VocabEngine, VocabRecord, VocabStats, WordInput,
    };
}
