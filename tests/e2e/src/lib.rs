//! Shared harness for wordstash end-to-end tests

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use wordstash_core::{FixedClock, VocabEngine, WordInput};

/// An engine pinned to a fixed clock over a throwaway snapshot
pub struct TestEngine {
    pub engine: VocabEngine,
    pub clock: FixedClock,
    // Held so the snapshot directory outlives the engine
    _dir: TempDir,
}

/// Build an engine whose clock starts at the given RFC 3339 instant
pub fn engine_at(now: &str) -> TestEngine {
    let dir = TempDir::new().expect("tempdir");
    let clock = FixedClock::new(parse_instant(now));
    let engine = VocabEngine::with_clock(Some(dir.path().join("records.json")), clock.clone())
        .expect("engine open");
    TestEngine {
        engine,
        clock,
        _dir: dir,
    }
}

/// Parse an RFC 3339 instant
pub fn parse_instant(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC 3339 timestamp")
}

/// A word input sourced from a fake deck file
pub fn word(word: &str, meaning: &str) -> WordInput {
    let mut input = WordInput::new(word, meaning);
    input.source = Some("deck.csv".to_string());
    input
}

/// Import a small deck and return the record ids in input order
pub fn import_deck(engine: &mut VocabEngine, words: &[(&str, &str)]) -> Vec<String> {
    words
        .iter()
        .map(|(w, m)| engine.upsert(&word(w, m)).expect("upsert").id)
        .collect()
}
