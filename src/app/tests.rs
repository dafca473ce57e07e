use super::*;
use crate::catalog::{Performer, TrackId};
use crate::quiz::RoundResult;

fn p(name: &str) -> Performer {
    Performer {
        id: name.to_lowercase(),
        name: name.into(),
        track_count: 1,
    }
}

fn result(correct: bool) -> RoundResult {
    RoundResult {
        round_index: 0,
        correct_track_id: TrackId::new("t"),
        correct_title: "T".into(),
        chosen: None,
        correct,
        finished: None,
    }
}

#[test]
fn new_app_starts_on_performers_with_dirty_listing() {
    let app = App::new();
    assert_eq!(app.screen, Screen::Performers);
    assert!(app.listing_dirty);
    assert!(app.selected_performer().is_none());
}

#[test]
fn set_performers_keeps_selection_on_same_performer() {
    let mut app = App::new();
    app.set_performers(vec![p("Alpha"), p("Beta"), p("Gamma")]);
    assert!(!app.listing_dirty);
    app.next();
    assert_eq!(app.selected_performer().unwrap().name, "Beta");

    app.set_performers(vec![p("Beta"), p("Gamma")]);
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_performer().unwrap().name, "Beta");

    app.set_performers(vec![p("Gamma")]);
    assert_eq!(app.selected_performer().unwrap().name, "Gamma");
}

#[test]
fn next_prev_wrap_around() {
    let mut app = App::new();
    app.set_performers(vec![p("Alpha"), p("Beta"), p("Gamma")]);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn navigation_on_empty_listing_is_a_no_op() {
    let mut app = App::new();
    app.set_performers(Vec::new());
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
}

#[test]
fn listing_dirty_is_set_on_filter_changes() {
    let mut app = App::new();
    app.set_performers(vec![p("Alpha")]);
    assert!(!app.listing_dirty);

    app.enter_filter_mode();
    app.push_filter_char('a');
    assert!(app.listing_dirty);
    assert_eq!(app.filter_query, "a");

    app.set_performers(vec![p("Alpha")]);
    app.pop_filter_char();
    assert!(app.listing_dirty);

    app.set_performers(vec![p("Alpha")]);
    app.push_filter_char('x');
    app.clear_filter();
    assert!(app.filter_query.is_empty());
    assert!(!app.filter_mode);
    assert!(app.listing_dirty);
}

#[test]
fn open_game_resets_results_and_notice() {
    let mut app = App::new();
    app.show_notice("try another performer");
    app.record_result(result(true));

    app.open_game(p("Alpha"));
    assert_eq!(app.screen, Screen::Game);
    assert!(app.notice.is_none());
    assert!(app.results.is_empty());
    assert_eq!(app.current_performer.as_ref().unwrap().name, "Alpha");

    app.record_result(result(true));
    app.record_result(result(false));
    app.record_result(result(true));
    assert_eq!(app.correct_count(), 2);
    assert!(app.last_result().unwrap().correct);

    app.back_to_performers();
    assert_eq!(app.screen, Screen::Performers);
    assert!(app.current_performer.is_none());
    assert!(app.results.is_empty());
}
