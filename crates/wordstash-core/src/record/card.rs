//! Vocabulary record - The unit of scheduling
//!
//! Each record tracks one word/meaning pair with:
//! - Content and provenance
//! - SM-2 scheduling state (interval, ease factor, repetitions)
//! - Round-session bookkeeping
//! - An append-only history log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HistoryAction, HistoryEntry};

/// Starting ease factor for a fresh record (classic SM-2)
pub const INITIAL_EASE: f64 = 2.5;

/// Namespace for deterministic record ids
const RECORD_ID_NAMESPACE: Uuid = Uuid::from_bytes([
    0x8f, 0x2a, 0x61, 0x4b, 0x7c, 0x55, 0x4d, 0x1e, 0x9a, 0x03, 0xd4, 0x27, 0x66, 0xb8, 0x1f,
    0x30,
]);

// ============================================================================
// LEARNING STATES
// ============================================================================

/// Lifecycle state of a vocabulary record
///
/// Always derived from `repetitions`/`streak` through the transition rule,
/// never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    /// Imported but never scheduled by a review
    #[default]
    New,
    /// Reviewed at least once without a qualifying repetition
    Learning,
    /// At least one qualifying repetition
    Reviewing,
    /// Five qualifying repetitions and a streak of three
    Mastered,
}

impl RecordState {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordState::New => "new",
            RecordState::Learning => "learning",
            RecordState::Reviewing => "reviewing",
            RecordState::Mastered => "mastered",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "learning" => RecordState::Learning,
            "reviewing" => RecordState::Reviewing,
            "mastered" => RecordState::Mastered,
            _ => RecordState::New,
        }
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DIFFICULTY RATING
// ============================================================================

/// User-chosen subjective difficulty (1 = easiest, 4 = hardest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Rating 1: knew it instantly
    Easy,
    /// Rating 2: knew it with some effort
    Medium,
    /// Rating 3: barely recalled it
    Hard,
    /// Rating 4: did not recall it
    VeryHard,
}

impl Difficulty {
    /// Numeric rating (1-4)
    pub fn rating(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::VeryHard => 4,
        }
    }

    /// Parse a 1-4 rating; anything else is rejected at the boundary
    pub fn from_rating(rating: u8) -> Option<Self> {
        match rating {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::VeryHard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rating())
    }
}

// ============================================================================
// RECORD IDENTITY
// ============================================================================

/// Deterministic record id from `(source, word, meaning)`
///
/// Normalization is case- and whitespace-insensitive, so two imports of the
/// same word/meaning pair from the same source collapse to one record.
pub fn record_id(source: Option<&str>, word: &str, meaning: &str) -> String {
    let key = format!(
        "{}\u{1f}{}\u{1f}{}",
        normalize(source.unwrap_or("")),
        normalize(word),
        normalize(meaning)
    );
    Uuid::new_v5(&RECORD_ID_NAMESPACE, key.as_bytes()).to_string()
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ============================================================================
// VOCABULARY RECORD
// ============================================================================

/// A vocabulary record tracked by the scheduler
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabRecord {
    /// Deterministic id (UUID v5 over source/word/meaning)
    pub id: String,
    /// The word being learned
    pub word: String,
    /// Its meaning in the user's language
    pub meaning: String,
    /// IPA or other pronunciation hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Part of speech
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    /// Example sentence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Where the word was imported from (deck file, PDF, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    // ========== Learning State ==========
    /// Lifecycle state, derived from repetitions/streak
    pub state: RecordState,
    /// Next scheduled review, anchored to local midnight
    pub next_review: DateTime<Utc>,
    /// Days until the next review
    pub interval_days: i64,
    /// SM-2 ease factor, never below 1.3
    pub ease_factor: f64,
    /// Consecutive qualifying reviews
    pub repetitions: i32,
    /// Consecutive correct answers
    pub streak: i32,
    /// Total reviews of this word
    pub times_reviewed: i32,
    /// Total correct answers for this word
    pub times_correct: i32,
    /// When the word was last reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    /// When the word last lapsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_lapse_at: Option<DateTime<Utc>>,

    // ========== Session Bookkeeping ==========
    /// Marked wrong in the current round; cleared only by a round reset
    #[serde(default)]
    pub wrong_in_current_round: bool,
    /// Queued for re-exposure in the next round; cleared only by a round reset
    #[serde(default)]
    pub needs_next_round: bool,

    /// Last user-chosen subjective difficulty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<Difficulty>,

    /// Append-only audit trail
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl VocabRecord {
    /// Create a record from an import, due immediately
    pub fn create(input: &WordInput, now: DateTime<Utc>) -> Self {
        let id = record_id(input.source.as_deref(), &input.word, &input.meaning);
        let mut record = Self {
            id,
            word: input.word.trim().to_string(),
            meaning: input.meaning.trim().to_string(),
            pronunciation: input.pronunciation.clone(),
            part_of_speech: input.part_of_speech.clone(),
            example: input.example.clone(),
            source: input.source.clone(),
            state: RecordState::New,
            next_review: now,
            interval_days: 0,
            ease_factor: INITIAL_EASE,
            repetitions: 0,
            streak: 0,
            times_reviewed: 0,
            times_correct: 0,
            last_review: None,
            last_lapse_at: None,
            wrong_in_current_round: false,
            needs_next_round: false,
            difficulty_rating: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        record.log(now, HistoryAction::Created, None);
        record
    }

    /// Merge optional content fields from a re-import
    pub fn merge(&mut self, input: &WordInput, now: DateTime<Utc>) {
        if input.pronunciation.is_some() {
            self.pronunciation = input.pronunciation.clone();
        }
        if input.part_of_speech.is_some() {
            self.part_of_speech = input.part_of_speech.clone();
        }
        if input.example.is_some() {
            self.example = input.example.clone();
        }
        self.log(now, HistoryAction::Reviewed, None);
        self.updated_at = now;
    }

    /// Append to the audit trail
    pub fn log(
        &mut self,
        timestamp: DateTime<Utc>,
        action: HistoryAction,
        data: Option<serde_json::Value>,
    ) {
        self.history.push(HistoryEntry {
            timestamp,
            action,
            data,
        });
    }

    /// Check if this record is due at the given instant
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Check if this record was due before the start of today
    pub fn is_overdue(&self, today_start: DateTime<Utc>) -> bool {
        self.next_review < today_start
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Upsert payload from the import layer
///
/// Uses `deny_unknown_fields` so malformed import rows fail loudly instead
/// of silently dropping data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WordInput {
    /// The word being learned
    pub word: String,
    /// Its meaning
    pub meaning: String,
    /// IPA or other pronunciation hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Part of speech
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    /// Example sentence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Where the word came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl WordInput {
    /// Minimal input with just word and meaning
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            ..Default::default()
        }
    }

    /// The deterministic id this input resolves to
    pub fn id(&self) -> String {
        record_id(self.source.as_deref(), &self.word, &self.meaning)
    }
}

// ============================================================================
// TESTS
// ============================================================================
