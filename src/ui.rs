//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen};
use crate::catalog::fuzzy_match_positions;
use crate::config::UiSettings;
use crate::quiz::{Phase, RoundResult, SessionController};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Key help for what the player can do right now.
fn controls_text(screen: Screen, phase: Phase, filter_mode: bool) -> String {
    let keys: &[(&str, &str)] = match (screen, phase) {
        (Screen::Performers, _) if filter_mode => &[
            ("type", "filter"),
            ("ctrl-j/k", "up/down"),
            ("enter", "play performer"),
            ("esc", "clear filter"),
        ],
        (Screen::Performers, _) => &[
            ("j/k", "up/down"),
            ("gg/G", "top/bottom"),
            ("/", "filter"),
            ("enter", "play performer"),
            ("q", "quit"),
        ],
        (Screen::Game, Phase::Ready) => &[("enter", "start"), ("esc", "back"), ("q", "quit")],
        (Screen::Game, Phase::Playing) => &[("1-9", "answer"), ("esc", "give up"), ("q", "quit")],
        (Screen::Game, _) => &[("enter/r", "play again"), ("esc", "back"), ("q", "quit")],
    };
    keys.iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// One-line summary of the game and the player's standing.
fn status_text(app: &App, controller: &SessionController) -> String {
    let mut parts: Vec<String> = Vec::new();
    let state = controller.state();

    match app.screen {
        Screen::Performers => {
            parts.push(format!(" PERFORMERS: {}", app.performers.len()));
            let q = app.filter_query.trim();
            if app.filter_mode || !q.is_empty() {
                let mut filter_part = String::from("FILTER:");
                if !q.is_empty() {
                    filter_part.push(' ');
                    filter_part.push_str(q);
                }
                parts.push(filter_part);
            }
        }
        Screen::Game => {
            if let Some(performer) = &app.current_performer {
                parts.push(format!(" PERFORMER: {}", performer.name));
            }
            let total = controller.round_count();
            if state.phase() == Phase::Playing {
                parts.push(format!("ROUND: {}/{}", state.round_index() + 1, total));
            } else {
                parts.push(format!("ROUNDS: {total}"));
            }
            parts.push(format!("SCORE: {}", state.score()));
        }
    }

    parts.push(format!("BEST: {}", controller.high_score()));
    if let Some(dir) = &app.library_dir {
        parts.push(format!("Dir: {dir}"));
    }
    parts.join(" • ")
}

/// Render `name` with the characters matching `query` upper-cased.
fn highlight(name: &str, query: &str) -> String {
    let Some(positions) = fuzzy_match_positions(name, query) else {
        return name.to_string();
    };
    let mut rendered = String::new();
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();

    for (ci, ch) in name.chars().enumerate() {
        if next_pos == Some(ci) {
            rendered.extend(ch.to_uppercase());
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

/// Window of `total` rows that fits `height` and keeps `selected` centered
/// when possible: `(start, end, selected position inside the window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Feedback line for a resolved round.
fn result_line(result: &RoundResult) -> String {
    let n = result.round_index + 1;
    match (&result.chosen, result.correct) {
        (_, true) => format!("✓ {n}. {}", result.correct_title),
        (Some(_), false) => format!("✗ {n}. {}", result.correct_title),
        (None, false) => format!("✗ {n}. {} (timed out)", result.correct_title),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, controller: &SessionController, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" earshot ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, controller))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    match app.screen {
        Screen::Performers => draw_performers(frame, app, chunks[2]),
        Screen::Game => match controller.state().phase() {
            Phase::Playing => draw_round(frame, app, controller, chunks[2]),
            Phase::Finished => draw_results(frame, app, controller, chunks[2]),
            Phase::Ready | Phase::Idle => draw_ready(frame, controller, chunks[2]),
        },
    }

    if let Some(notice) = &app.notice {
        let popup_area = centered_rect_sized(60, 5, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(notice.as_str())
            .block(Block::bordered().padding(LEFT_PAD).title(" note "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    let footer = Paragraph::new(controls_text(
        app.screen,
        controller.state().phase(),
        app.filter_mode,
    ))
    .block(Block::bordered().padding(LEFT_PAD).title(" controls "))
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_performers(frame: &mut Frame, app: &App, area: Rect) {
    let q = app.filter_query.trim();
    let total = app.performers.len();
    // Only build ListItems for the visible window.
    let (start, end, selected_in_window) =
        visible_window(total, area.height.saturating_sub(2) as usize, app.selected);

    let items: Vec<ListItem> = app.performers[start..end]
        .iter()
        .map(|p| {
            let name = if q.is_empty() {
                p.name.clone()
            } else {
                highlight(&p.name, q)
            };
            ListItem::new(format!("{name} ({})", p.track_count))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" performers "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_ready(frame: &mut Frame, controller: &SessionController, area: Rect) {
    let performer = controller
        .rounds()
        .map(|r| r.performer().to_string())
        .unwrap_or_default();
    let text = format!(
        "{} rounds of {performer}.\n\nListen to the preview and pick its title before the time runs out.\n\nPress enter when ready.",
        controller.round_count()
    );
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" get ready "))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_round(frame: &mut Frame, app: &App, controller: &SessionController, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let total_ticks = controller.round_ticks().max(1);
    let remaining = controller.remaining_ticks().unwrap_or(0).min(total_ticks);
    let index = controller.state().round_index();
    let loading = if controller.is_preview_ready(index) {
        ""
    } else {
        " (streaming)"
    };
    let gauge = Gauge::default()
        .block(Block::bordered().title(format!(" round {}{loading} ", index + 1)))
        .ratio(f64::from(remaining) / f64::from(total_ticks))
        .label(format!("{remaining}"))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, parts[0]);

    let items: Vec<ListItem> = controller
        .current_round()
        .map(|round| {
            round
                .choices
                .iter()
                .enumerate()
                .map(|(i, c)| ListItem::new(format!("{}. {}", i + 1, c.title)))
                .collect()
        })
        .unwrap_or_default();
    let list = List::new(items).block(Block::bordered().padding(LEFT_PAD).title(" which track is it? "));
    frame.render_widget(list, parts[1]);

    let last = app.last_result().map(result_line).unwrap_or_default();
    let feedback = Paragraph::new(last).block(Block::bordered().padding(LEFT_PAD).title(" last round "));
    frame.render_widget(feedback, parts[2]);
}

fn draw_results(frame: &mut Frame, app: &App, controller: &SessionController, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let summary = match controller.last_report() {
        Some(report) if report.is_new_high_score => format!(
            "Score {}/{} • NEW HIGH SCORE!",
            report.score, report.total_rounds
        ),
        Some(report) => format!(
            "Score {}/{} • best {}",
            report.score, report.total_rounds, report.high_score
        ),
        None => format!("Score {}", controller.state().score()),
    };
    let summary = Paragraph::new(summary)
        .alignment(Alignment::Center)
        .bold()
        .block(Block::bordered().title(" game over "));
    frame.render_widget(summary, parts[0]);

    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|r| ListItem::new(result_line(r)))
        .collect();
    let list = List::new(items).block(Block::bordered().padding(LEFT_PAD).title(" answers "));
    frame.render_widget(list, parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackId;

    #[test]
    fn controls_follow_screen_and_phase() {
        let listing = controls_text(Screen::Performers, Phase::Idle, false);
        assert!(listing.contains("[/] filter"));
        assert!(controls_text(Screen::Performers, Phase::Idle, true).contains("[esc] clear filter"));
        assert!(controls_text(Screen::Game, Phase::Ready, false).contains("[enter] start"));
        assert!(controls_text(Screen::Game, Phase::Playing, false).contains("[1-9] answer"));
        assert!(controls_text(Screen::Game, Phase::Finished, false).contains("play again"));
    }

    #[test]
    fn highlight_upper_cases_matched_chars() {
        assert_eq!(highlight("abba", "bb"), "aBBa");
        assert_eq!(highlight("abba", "xyz"), "abba");
    }

    #[test]
    fn visible_window_centers_selection() {
        assert_eq!(visible_window(3, 10, 2), (0, 3, 2));
        assert_eq!(visible_window(20, 5, 10), (8, 13, 2));
        assert_eq!(visible_window(20, 5, 19), (15, 20, 4));
        assert_eq!(visible_window(20, 5, 0), (0, 5, 0));
    }

    #[test]
    fn result_lines_tell_how_the_round_ended() {
        let mut r = RoundResult {
            round_index: 2,
            correct_track_id: TrackId::new("t"),
            correct_title: "Song".into(),
            chosen: Some(TrackId::new("t")),
            correct: true,
            finished: None,
        };
        assert_eq!(result_line(&r), "✓ 3. Song");
        r.correct = false;
        r.chosen = Some(TrackId::new("u"));
        assert_eq!(result_line(&r), "✗ 3. Song");
        r.chosen = None;
        assert_eq!(result_line(&r), "✗ 3. Song (timed out)");
    }
}
