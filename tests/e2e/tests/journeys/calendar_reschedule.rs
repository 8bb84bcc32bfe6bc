//! Journey: the calendar view, overdue handling, and drag-style
//! rescheduling between day cells

use chrono::Duration;
use wordstash_e2e_tests::{engine_at, import_deck, parse_instant};

#[test]
fn overdue_words_leave_the_day_grid() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("ephemeral", "short-lived")]);
    t.engine.record_review(&ids[0], 3, true).unwrap();

    // Due tomorrow: a day bucket, not overdue
    let calendar = t.engine.get_calendar_data(14);
    assert!(calendar.overdue.is_empty());
    assert_eq!(calendar.on(parse_instant("2026-01-06T00:00:00Z").date_naive()).len(), 1);

    // Skip two days without reviewing: re-derive moves it to overdue
    t.clock.advance(Duration::days(2));
    let calendar = t.engine.get_calendar_data(14);
    assert_eq!(calendar.overdue.len(), 1);
    assert!(calendar.days.is_empty());
    assert_eq!(t.engine.get_overdue_cards().len(), 1);
}

#[test]
fn reschedule_moves_word_to_target_day_and_clears_overdue() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("ephemeral", "short-lived")]);
    t.engine.record_review(&ids[0], 3, true).unwrap();
    t.clock.advance(Duration::days(3));
    assert_eq!(t.engine.get_overdue_cards().len(), 1);

    // Drop it on the cell ten days out; the time of day does not matter
    let target = parse_instant("2026-01-18T12:00:00Z");
    let moved = t.engine.reschedule(&ids[0], target).unwrap();
    assert_eq!(moved.interval_days, 10);
    assert_eq!(moved.next_review, parse_instant("2026-01-18T00:00:00Z"));

    let calendar = t.engine.get_calendar_data(14);
    assert!(calendar.overdue.is_empty());
    assert_eq!(calendar.on(target.date_naive()).len(), 1);
    assert!(t.engine.get_overdue_cards().is_empty());
}

#[test]
fn removal_from_schedule_empties_the_window_but_keeps_the_word() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("ephemeral", "short-lived")]);
    t.engine.record_review(&ids[0], 4, true).unwrap();
    assert_eq!(t.engine.get_calendar_data(14).len(), 1);

    t.engine.remove_from_schedule(&ids[0]).unwrap();

    assert!(t.engine.get_calendar_data(365).is_empty());
    let kept = t.engine.get(&ids[0]).unwrap();
    assert_eq!(kept.word, "ephemeral");
    assert!(!kept.history.is_empty());
}

#[test]
fn window_is_exclusive_at_the_far_edge() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(&mut t.engine, &[("ephemeral", "short-lived")]);
    // Quality 5 seeds a seven-day interval, due exactly today + 7
    t.engine.record_review(&ids[0], 5, true).unwrap();

    assert!(t.engine.get_calendar_data(7).is_empty());
    assert_eq!(t.engine.get_calendar_data(8).len(), 1);
}

#[test]
fn new_words_stay_off_the_calendar_until_reviewed() {
    let mut t = engine_at("2026-01-05T09:00:00Z");
    let ids = import_deck(
        &mut t.engine,
        &[("ephemeral", "short-lived"), ("petrichor", "rain smell")],
    );

    assert!(t.engine.get_calendar_data(14).is_empty());

    t.engine.record_review(&ids[0], 4, true).unwrap();
    let calendar = t.engine.get_calendar_data(14);
    assert_eq!(calendar.len(), 1);
    assert_eq!(
        calendar.on(parse_instant("2026-01-08T00:00:00Z").date_naive())[0].id,
        ids[0]
    );
}
