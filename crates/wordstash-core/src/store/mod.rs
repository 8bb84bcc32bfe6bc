//! Record Store
//!
//! Keyed storage of vocabulary records with:
//! - Whole-file JSON snapshot persistence (load at startup, rewrite on
//!   every mutation)
//! - Synchronous persist-then-notify: readers never observe partial state
//! - Subscriber callbacks carrying no payload ("something changed,
//!   re-read")
//!
//! No scheduling logic lives here; the engine computes outcomes and the
//! store applies them. Concurrent edits to one id are last-writer-wins,
//! with `updated_at` making the write order observable.

mod snapshot;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::record::{VocabRecord, WordInput};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Store error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// Rejected import payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;

/// Handle returned by [`RecordStore::subscribe`]
pub type SubscriptionId = u64;

// ============================================================================
// RECORD STORE
// ============================================================================

/// In-memory record map with snapshot persistence and change notification
pub struct RecordStore {
    records: HashMap<String, VocabRecord>,
    snapshot_path: PathBuf,
    subscribers: Vec<(SubscriptionId, Box<dyn Fn()>)>,
    next_subscription: SubscriptionId,
}

impl RecordStore {
    /// Open a store, loading the snapshot at `path` (or the default
    /// platform location when `None`)
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let snapshot_path = match path {
            Some(p) => p,
            None => snapshot::default_path()?,
        };
        let records = snapshot::load(&snapshot_path)?;
        tracing::debug!(
            records = records.len(),
            path = %snapshot_path.display(),
            "record store opened"
        );
        Ok(Self {
            records,
            snapshot_path,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    // ========== CRUD ==========

    /// Create a record or merge fields into an existing one
    ///
    /// Identity is deterministic over `(source, word, meaning)`, so
    /// repeated imports of the same triple resolve to one record.
    pub fn upsert(&mut self, input: &WordInput, now: DateTime<Utc>) -> Result<VocabRecord> {
        if input.word.trim().is_empty() {
            return Err(StoreError::InvalidInput("word must not be empty".into()));
        }
        if input.meaning.trim().is_empty() {
            return Err(StoreError::InvalidInput("meaning must not be empty".into()));
        }

        let id = input.id();
        let record = match self.records.get_mut(&id) {
            Some(existing) => {
                existing.merge(input, now);
                existing.clone()
            }
            None => {
                let record = VocabRecord::create(input, now);
                self.records.insert(id.clone(), record.clone());
                record
            }
        };
        self.commit();
        Ok(record)
    }

    /// Get a record by id
    pub fn get(&self, id: &str) -> Option<&VocabRecord> {
        self.records.get(id)
    }

    /// All records, unordered
    pub fn get_all(&self) -> Vec<VocabRecord> {
        self.records.values().cloned().collect()
    }

    /// Whether a record exists
    pub fn has(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hard-delete a record; returns whether it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let existed = self.records.remove(id).is_some();
        if existed {
            self.commit();
        }
        existed
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
        self.commit();
    }

    /// Mutate a record in place, then persist and notify
    ///
    /// Unknown ids are a no-op returning `None`, so callers can
    /// fire-and-forget.
    pub fn update_with<F>(&mut self, id: &str, mutate: F) -> Option<VocabRecord>
    where
        F: FnOnce(&mut VocabRecord),
    {
        let record = match self.records.get_mut(id) {
            Some(record) => {
                mutate(record);
                record.clone()
            }
            None => {
                tracing::debug!(id, "update on unknown record id ignored");
                return None;
            }
        };
        self.commit();
        Some(record)
    }

    /// Mutate every record, then persist and notify once; returns how many
    /// records the closure flagged as changed
    pub fn update_all<F>(&mut self, mut mutate: F) -> usize
    where
        F: FnMut(&mut VocabRecord) -> bool,
    {
        let mut changed = 0;
        for record in self.records.values_mut() {
            if mutate(record) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.commit();
        }
        changed
    }

    // ========== CHANGE NOTIFICATION ==========

    /// Register a callback fired after every successful mutation
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Persist the snapshot, then notify subscribers
    ///
    /// A failed save is logged and swallowed: the in-memory map stays
    /// authoritative and the next successful save catches up.
    fn commit(&mut self) {
        if let Err(e) = snapshot::save(&self.snapshot_path, &self.records) {
            tracing::error!(
                error = %e,
                path = %self.snapshot_path.display(),
                "snapshot save failed; in-memory state retained"
            );
        }
        for (_, callback) in &self.subscribers {
            callback();
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .field("snapshot_path", &self.snapshot_path)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
