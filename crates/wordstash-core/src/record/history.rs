//! Append-only review history
//!
//! Every mutation of a record's learning state leaves an entry here. The
//! log is only ever appended to; the scheduling fields on the record are
//! a projection of it, not the other way around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a record at a point in time
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// Record was created on first import or study exposure
    Created,
    /// Record was shown and answered in a review
    Reviewed,
    /// Answer was counted as correct
    Correct,
    /// Answer was counted as incorrect
    Incorrect,
    /// User assigned a subjective difficulty rating
    DifficultySet,
    /// Due date was moved outside the normal review flow
    Rescheduled,
    /// Review gap was long enough to partially reset learning progress
    Lapsed,
}

impl HistoryAction {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "created",
            HistoryAction::Reviewed => "reviewed",
            HistoryAction::Correct => "correct",
            HistoryAction::Incorrect => "incorrect",
            HistoryAction::DifficultySet => "difficulty_set",
            HistoryAction::Rescheduled => "rescheduled",
            HistoryAction::Lapsed => "lapsed",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a record's audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// What happened
    pub action: HistoryAction,
    /// Structured event payload (quality, gap length, target date, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// Create an entry with no payload
    pub fn new(timestamp: DateTime<Utc>, action: HistoryAction) -> Self {
        Self {
            timestamp,
            action,
            data: None,
        }
    }

    /// Create an entry with a structured payload
    pub fn with_data(
        timestamp: DateTime<Utc>,
        action: HistoryAction,
        data: serde_json::Value,
    ) -> Self {
        Self {
            timestamp,
            action,
            data: Some(data),
        }
    }
}
