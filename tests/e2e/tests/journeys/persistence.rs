//! Journey: close the app and come back — the snapshot is the only
//! durable state

use std::cell::Cell;
use std::rc::Rc;

use chrono::Duration;
use tempfile::TempDir;
use wordstash_core::{FixedClock, HistoryAction, RecordState, VocabEngine};
use wordstash_e2e_tests::{import_deck, parse_instant, word};

fn reopen(dir: &TempDir, clock: &FixedClock) -> VocabEngine {
    VocabEngine::with_clock(Some(dir.path().join("records.json")), clock.clone())
        .expect("reopen engine")
}

#[test]
fn scheduling_state_and_history_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));

    let (id, before) = {
        let mut engine = reopen(&dir, &clock);
        let ids = import_deck(&mut engine, &[("ephemeral", "short-lived")]);
        engine.record_review(&ids[0], 5, true).unwrap();
        clock.advance(Duration::days(7));
        let record = engine.record_review(&ids[0], 4, true).unwrap();
        (ids[0].clone(), record)
    };

    let engine = reopen(&dir, &clock);
    let after = engine.get(&id).expect("record survives reopen");

    assert_eq!(after.interval_days, before.interval_days);
    assert_eq!(after.ease_factor, before.ease_factor);
    assert_eq!(after.repetitions, 2);
    assert_eq!(after.next_review, before.next_review);
    assert_eq!(after.times_reviewed, 2);
    assert_eq!(after.history.len(), before.history.len());
    assert_eq!(after.history[0].action, HistoryAction::Created);
    assert_eq!(after.state, RecordState::Reviewing);
}

#[test]
fn reimport_after_reopen_still_dedups() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));

    let id = {
        let mut engine = reopen(&dir, &clock);
        engine.upsert(&word("ephemeral", "short-lived")).unwrap().id
    };

    // Same deck imported again in a fresh process
    let mut engine = reopen(&dir, &clock);
    let merged = engine.upsert(&word("Ephemeral", "Short-Lived")).unwrap();

    assert_eq!(merged.id, id);
    assert_eq!(engine.get_stats().total, 1);
}

#[test]
fn missing_snapshot_opens_empty() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));

    let engine = reopen(&dir, &clock);
    assert_eq!(engine.get_stats().total, 0);
    assert!(engine.store().is_empty());
}

#[test]
fn corrupt_snapshot_is_an_error_not_a_wipe() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));
    let path = dir.path().join("records.json");

    std::fs::write(&path, b"{ not json").unwrap();
    let result = VocabEngine::with_clock(Some(path.clone()), clock.clone());
    assert!(result.is_err());

    // The broken file is left in place for the user to recover
    assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
}

#[test]
fn subscribers_fire_once_per_engine_mutation() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));
    let mut engine = reopen(&dir, &clock);

    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    let sub = engine.subscribe(move || counter.set(counter.get() + 1));

    let record = engine.upsert(&word("ephemeral", "short-lived")).unwrap();
    engine.record_review(&record.id, 4, true).unwrap();
    engine.reset_round_flags(); // nothing flagged, no notification
    assert_eq!(fired.get(), 2);

    assert!(engine.unsubscribe(sub));
    engine.delete(&record.id);
    assert_eq!(fired.get(), 2);
}

#[test]
fn snapshot_written_on_every_mutation_not_on_drop() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(parse_instant("2026-01-05T09:00:00Z"));
    let path = dir.path().join("records.json");

    let mut engine = reopen(&dir, &clock);
    let record = engine.upsert(&word("ephemeral", "short-lived")).unwrap();

    // Read the snapshot back while the engine is still alive
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed.get(&record.id).is_some());
    assert_eq!(parsed[&record.id]["word"], "ephemeral");
    assert_eq!(parsed[&record.id]["state"], "new");
}
