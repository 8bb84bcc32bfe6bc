//! Journey: study sessions with round-based requeueing, finishing in the
//! end-of-session rating step

use chrono::Duration;
use wordstash_core::{Clock, Difficulty, RecordState, SessionKind};
use wordstash_e2e_tests::{engine_at, import_deck};

/// Play out the current round, marking the given ids wrong once each
fn run_round(session: &mut wordstash_core::RoundSession, wrong: &[&String]) {
    let round = session.round();
    while session.round() == round && !session.is_finished() {
        let current = session.current().unwrap().to_string();
        if wrong.iter().any(|id| ***id == *current) {
            session.mark_wrong();
        }
        session.pass();
    }
}

#[test]
fn wrong_word_gets_a_second_round_alone() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(
        &mut t.engine,
        &[("a", "first"), ("b", "second"), ("c", "third")],
    );

    let mut session = t.engine.start_custom_session(ids.clone());
    assert_eq!(session.kind(), SessionKind::Custom);
    assert_eq!(session.round(), 1);

    run_round(&mut session, &[&ids[0]]);

    assert_eq!(session.round(), 2);
    assert_eq!(session.current(), Some(ids[0].as_str()));
    assert_eq!(session.remaining_in_round(), 1);

    run_round(&mut session, &[]);
    assert!(session.is_finished());
    assert_eq!(session.touched_words().len(), 3);
}

#[test]
fn custom_session_ends_in_post_session_ratings() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("a", "first"), ("b", "second")]);

    let mut session = t.engine.start_custom_session(ids.clone());
    run_round(&mut session, &[&ids[1]]);
    run_round(&mut session, &[]);
    assert!(session.is_finished());

    // Rate everything the session touched
    for id in session.touched_words().to_vec() {
        let difficulty = if id == ids[1] {
            Difficulty::VeryHard
        } else {
            Difficulty::Easy
        };
        let rated = t
            .engine
            .apply_difficulty_and_recompute_schedule(&id, difficulty)
            .unwrap();
        assert_ne!(rated.state, RecordState::New);
    }

    assert_eq!(t.engine.get(&ids[0]).unwrap().interval_days, 7);
    assert_eq!(t.engine.get(&ids[1]).unwrap().interval_days, 1);
    assert_eq!(t.engine.get_stats().new, 0);
}

#[test]
fn smart_review_session_draws_from_due_cards() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(
        &mut t.engine,
        &[("a", "first"), ("b", "second"), ("c", "third")],
    );

    // Schedule two words a day out, leave one new
    t.engine.record_review(&ids[0], 3, true).unwrap();
    t.engine.record_review(&ids[1], 3, true).unwrap();

    // Nothing due yet
    let empty = t.engine.start_smart_review_session();
    assert!(empty.is_finished());

    // Next day both come due; the untouched new word stays out
    t.clock.advance(Duration::days(1));
    let mut session = t.engine.start_smart_review_session();
    assert_eq!(session.kind(), SessionKind::SmartReview);
    assert_eq!(session.remaining_in_round(), 2);

    run_round(&mut session, &[]);
    assert!(session.is_finished());
    assert!(!session.touched_words().contains(&ids[2]));
}

#[test]
fn unrated_words_are_pulled_back_to_today() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("a", "first"), ("b", "second")]);

    let mut session = t.engine.start_custom_session(ids.clone());
    run_round(&mut session, &[]);
    assert!(session.is_finished());

    // The user rated only the first word and closed the app
    t.engine
        .apply_difficulty_and_recompute_schedule(&ids[0], Difficulty::Medium)
        .unwrap();
    let unrated = t.engine.schedule_for_today(&ids[1], "unrated").unwrap();

    assert!(unrated.is_due(t.clock.now()));
    assert_eq!(unrated.interval_days, 1);
    assert_eq!(t.engine.get(&ids[0]).unwrap().interval_days, 4);
}

#[test]
fn round_flags_mirror_session_and_reset_clears_them() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("a", "first"), ("b", "second")]);

    // UI mirrors session wrongs onto the sticky record flags
    t.engine.set_round_flags(&ids[0], true, true).unwrap();
    t.engine.set_round_flags(&ids[1], false, false).unwrap();

    let flagged = t.engine.get(&ids[0]).unwrap();
    assert!(flagged.wrong_in_current_round);
    assert!(flagged.needs_next_round);

    // Explicit round reset is the only thing that clears them
    assert_eq!(t.engine.reset_round_flags(), 1);
    assert!(!t.engine.get(&ids[0]).unwrap().wrong_in_current_round);
}
