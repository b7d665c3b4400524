//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the album page using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, ListLine};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::{TrackKey, TrackRow};

const BAR_WIDTH: usize = 12;

/// Render the controls help text.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] up/down".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[enter/space] play/pause".to_string(),
        "[e] expand album".to_string(),
        format!("[H/L] scrub -/+{}%", controls.scrub_percent),
        format!("[-/+] volume {}%", controls.volume_step),
        "[zz] now playing".to_string(),
        "[n] news".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// A fixed-width text progress bar.
fn progress_bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

fn track_marker(row: Option<&TrackRow>, active: bool) -> &'static str {
    match row {
        None => " ",
        Some(r) if r.is_playing() => ">",
        Some(r) if active && !r.is_ready() => "~",
        Some(r) if r.resume_ms() > 0 || active => "=",
        Some(_) => " ",
    }
}

fn track_line<'a>(app: &'a App, key: &TrackKey) -> Line<'a> {
    let Some(album) = app.albums.iter().find(|a| a.id == key.album_id) else {
        return Line::from("");
    };
    let Some(track) = album.tracks.get(key.index) else {
        return Line::from("");
    };

    let row = app.row(key);
    let active = app.coordinator().active() == Some(key);
    let is_last = row
        .map(TrackRow::is_last_in_album)
        .unwrap_or(key.index + 1 == album.tracks.len());
    let branch = if is_last {
        "└"
    } else {
        "├"
    };
    let played = if app.has_been_played(key) { "*" } else { " " };

    let mut spans = vec![
        Span::raw(format!("  {branch} {} {played} ", track_marker(row, active))),
        Span::raw(format!("{:>2}. ", key.index + 1)),
    ];
    let title = Span::raw(track.title.as_str());
    spans.push(if active { title.bold() } else { title });

    if let Some(row) = row {
        if active || row.resume_ms() > 0 {
            spans.push(Span::raw(format!("  {}", progress_bar(row.progress_pct()))));
        }
        spans.push(Span::raw(format!("  {}", row.time_label())).dim());
    } else if !track.duration.is_empty() {
        spans.push(Span::raw(format!("  {}", track.duration)).dim());
    }
    Line::from(spans)
}

fn list_item<'a>(app: &'a App, line: &ListLine) -> ListItem<'a> {
    match line {
        ListLine::Album(ai) => {
            let album = &app.albums[*ai];
            let fold = if app.is_expanded(&album.id) { "▾" } else { "▸" };
            let year = album.year.map(|y| format!(" ({y})")).unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::raw(format!("{fold} ")),
                Span::raw(format!("{}{}", album.title, year)).bold(),
                Span::raw(format!("  {} tracks", album.tracks.len())).dim(),
            ]))
        }
        ListLine::Track(key) => ListItem::new(track_line(app, key)),
        ListLine::More { hidden, .. } => {
            ListItem::new(Line::from(format!("  … {hidden} more (enter to expand)")).dim())
        }
    }
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.now_playing() {
        Some((album, track, row)) => {
            let state = match row {
                Some(r) if r.is_playing() => "Playing",
                Some(r) if !r.is_ready() => "Loading",
                Some(_) => "Paused",
                None => "Waiting (expand album)",
            };
            parts.push(format!("{state}: {} - {}", album.title, track.title));
            if let Some(r) = row {
                parts.push(format!("-{}", r.time_label()));
            }
        }
        None => parts.push("Nothing playing".to_string()),
    }

    parts.push(format!("Volume: {}%", app.volume));
    parts.join(" • ")
}

/// Newest-first news list.
fn draw_news(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.news.is_empty() {
        vec![ListItem::new("No news")]
    } else {
        app.news
            .iter()
            .map(|n| {
                let mut lines = vec![Line::from(vec![
                    Span::raw(n.date.as_str()).dim(),
                    Span::raw(" "),
                    Span::raw(n.title.as_str()).bold(),
                ])];
                if !n.summary.trim().is_empty() {
                    lines.push(Line::from(format!("  {}", n.summary.trim())));
                }
                ListItem::new(lines)
            })
            .collect()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" news "));
    frame.render_widget(list, area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings, controls_settings: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header_text = if ui_settings.header_text.trim().is_empty() {
        app.artist.clone().unwrap_or_else(|| "encore".to_string())
    } else {
        ui_settings.header_text.clone()
    };
    let header = Paragraph::new(header_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" encore ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let (list_area, news_area) = if app.show_news {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[2]);
        (split[0], Some(split[1]))
    } else {
        (chunks[2], None)
    };

    // Main list
    {
        let lines = app.visible_lines();

        // Center the selected item when possible by creating a visible window.
        let total = lines.len();
        let list_height = list_area.height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let items: Vec<ListItem> = lines[start..end].iter().map(|l| list_item(app, l)).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" music "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    if let Some(area) = news_area {
        draw_news(frame, app, area);
    }

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
