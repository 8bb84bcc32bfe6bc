//! Record module - Core types and data structures
//!
//! Implements the vocabulary record model:
//! - Vocabulary records with SM-2 scheduling state
//! - Deterministic identity for import dedup
//! - Append-only review history (audit trail)
//! - Aggregate statistics

mod card;
mod history;

pub use card::{record_id, Difficulty, RecordState, VocabRecord, WordInput};
pub use history::{HistoryAction, HistoryEntry};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// VOCABULARY STATISTICS
// ============================================================================

/// Statistics about the record store
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabStats {
    /// Total number of vocabulary records
    pub total: i64,
    /// Records never reviewed
    pub new: i64,
    /// Records in the learning state
    pub learning: i64,
    /// Records in the reviewing state
    pub reviewing: i64,
    /// Records considered mastered
    pub mastered: i64,
    /// Non-new records due now or earlier
    pub due_today: i64,
    /// Records whose due date fell before the start of today
    pub overdue: i64,
    /// Total reviews recorded across all words
    pub total_reviews: i64,
    /// Total correct answers recorded across all words
    pub total_correct: i64,
    /// Timestamp of the oldest record
    pub oldest_record: Option<DateTime<Utc>>,
    /// Timestamp of the newest record
    pub newest_record: Option<DateTime<Utc>>,
}
