//! Round Session Queue
//!
//! Sequences one study session: a shuffled queue per round, immediate
//! retries, and a guaranteed re-exposure rule — a word marked wrong at any
//! point in a round comes back in the next round no matter how its
//! retries went. The session owns all of its state; nothing here touches
//! persisted records.
//!
//! When the queue is exhausted and nothing is waiting for re-exposure,
//! the session ends and every distinct word touched is handed to the
//! difficulty-rating step.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Which study track a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Freshly chosen words, first-time scheduling
    Custom,
    /// Words already due per the scheduler
    SmartReview,
}

/// In-memory state for one study session
#[derive(Debug)]
pub struct RoundSession {
    kind: SessionKind,
    round: u32,
    queue: Vec<String>,
    position: usize,
    wrong_this_round: HashSet<String>,
    to_review: Vec<String>,
    touched: Vec<String>,
    finished: bool,
}

impl RoundSession {
    /// Start a session over a deck of record ids; the first round is the
    /// shuffled, deduplicated deck
    pub fn new(deck: Vec<String>, kind: SessionKind) -> Self {
        let mut seen = HashSet::new();
        let mut queue: Vec<String> = deck
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        queue.shuffle(&mut rand::rng());

        let finished = queue.is_empty();
        Self {
            kind,
            round: 1,
            queue,
            position: 0,
            wrong_this_round: HashSet::new(),
            to_review: Vec::new(),
            touched: Vec::new(),
            finished,
        }
    }

    /// Which study track this session is on
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Current round, starting at 1
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether every round has been completed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Words left in the current round, including the current one
    pub fn remaining_in_round(&self) -> usize {
        self.queue.len().saturating_sub(self.position)
    }

    /// The word currently shown, if the session is still running
    pub fn current(&self) -> Option<&str> {
        if self.finished {
            return None;
        }
        self.queue.get(self.position).map(String::as_str)
    }

    /// Mark the current word wrong; it is guaranteed re-exposure next
    /// round regardless of later retries
    pub fn mark_wrong(&mut self) {
        if let Some(id) = self.current() {
            self.wrong_this_round.insert(id.to_string());
        }
    }

    /// Retry the current word immediately; no state changes
    pub fn retry(&self) -> Option<&str> {
        self.current()
    }

    /// Advance past the current word
    ///
    /// A word wrong earlier in this round is appended to the next round's
    /// queue (deduplicated by identity) even if the final retry succeeded.
    pub fn pass(&mut self) -> Option<&str> {
        let Some(id) = self.current().map(str::to_string) else {
            return None;
        };

        if !self.touched.contains(&id) {
            self.touched.push(id.clone());
        }
        if self.wrong_this_round.contains(&id) && !self.to_review.contains(&id) {
            self.to_review.push(id.clone());
        }

        self.position += 1;
        if self.position >= self.queue.len() {
            self.next_round();
        }
        self.current()
    }

    /// Every distinct word shown this session, in first-exposure order;
    /// the input to the end-of-session rating step
    pub fn touched_words(&self) -> &[String] {
        &self.touched
    }

    /// Queue exhausted: promote the re-exposure list to a new round, or
    /// end the session
    fn next_round(&mut self) {
        if self.to_review.is_empty() {
            self.finished = true;
            tracing::debug!(
                kind = ?self.kind,
                rounds = self.round,
                words = self.touched.len(),
                "session finished"
            );
            return;
        }
        self.queue = std::mem::take(&mut self.to_review);
        self.queue.shuffle(&mut rand::rng());
        self.position = 0;
        self.round += 1;
        self.wrong_this_round.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================
