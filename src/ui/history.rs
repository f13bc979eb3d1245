use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::app::HistoryView;
use crate::history::SessionRecord;
use crate::mood::{MoodLog, MoodSummary};
use crate::util::pluralize;
use crate::App;

/// "5 minutes ago" style label relative to `now`
pub fn humanize_since(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - then).to_std().unwrap_or_default();
    if elapsed.as_secs() < 60 {
        return "just now".to_string();
    }
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

pub fn present_session_row(record: &SessionRecord, now: DateTime<Local>) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.technique.display_name()),
        Cell::from(format!("{} min", record.minutes)),
        Cell::from(humanize_since(record.completed_at, now))
            .style(Style::default().fg(Color::Gray)),
    ])
}

/// Intensity as a small bar, e.g. `●●●○○`
pub fn intensity_bar(intensity: u8) -> String {
    let filled = intensity.min(crate::mood::MAX_INTENSITY) as usize;
    let empty = crate::mood::MAX_INTENSITY as usize - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}

pub fn present_mood_row(entry: &MoodLog, now: DateTime<Local>) -> Row<'static> {
    let color = if entry.mood.is_positive() {
        Color::Green
    } else {
        Color::Yellow
    };
    Row::new(vec![
        Cell::from(format!("{} {}", entry.mood.emoji(), entry.mood)).style(Style::default().fg(color)),
        Cell::from(intensity_bar(entry.intensity)),
        Cell::from(entry.note.clone().unwrap_or_default()),
        Cell::from(humanize_since(entry.logged_at, now)).style(Style::default().fg(Color::Gray)),
    ])
}

pub fn summary_line(view: &HistoryView) -> String {
    let sessions = &view.session_summary;
    let mut parts = vec![format!(
        "{} · {} breathed",
        pluralize(sessions.total_sessions, "session", "sessions"),
        pluralize(sessions.total_minutes, "minute", "minutes"),
    )];
    if let Some((kind, _)) = sessions.by_technique.first() {
        parts.push(format!("favourite: {}", kind.display_name()));
    }
    if let Some(moods) = &view.mood_summary {
        parts.push(mood_line(moods));
    }
    if view.positive_streak > 0 {
        parts.push(format!(
            "calm streak: {}",
            pluralize(view.positive_streak as u64, "check-in", "check-ins")
        ));
    }
    parts.join("   ")
}

fn mood_line(moods: &MoodSummary) -> String {
    let mut line = pluralize(moods.total_logs as u64, "mood log", "mood logs");
    if let Some(avg) = moods.average_intensity {
        line.push_str(&format!(", avg intensity {avg:.1}"));
    }
    if let Some(mood) = moods.most_frequent() {
        line.push_str(&format!(", mostly {} {}", mood.emoji(), mood));
    }
    line
}

pub fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Summary
            Constraint::Min(0),    // Tables
            Constraint::Length(3), // Instructions
        ])
        .split(area);

    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let Some(view) = &app.history_view else {
        let message = match &app.last_error {
            Some(err) => format!("History is unavailable: {err}"),
            None => "History is unavailable.\nNo local state directory could be opened.".to_string(),
        };
        Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title("History"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
        render_instructions(chunks[2], buf);
        return;
    };

    Paragraph::new(summary_line(view))
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(title_style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let now = Local::now();
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    if view.sessions.is_empty() {
        empty_panel("Sessions", "No sessions yet.\nFinish a breathing session to see it here.")
            .render(tables[0], buf);
    } else {
        let rows: Vec<Row> = view
            .sessions
            .iter()
            .map(|r| present_session_row(r, now))
            .collect();
        Table::new(
            rows,
            &[
                Constraint::Min(22),
                Constraint::Length(7),
                Constraint::Min(14),
            ],
        )
        .header(Row::new(vec!["Technique", "Length", "When"]).style(header_style))
        .block(Block::default().borders(Borders::ALL).title("Sessions"))
        .render(tables[0], buf);
    }

    if view.moods.is_empty() {
        empty_panel("Moods", "No check-ins yet.\nRun `exhale mood <mood>` to add one.")
            .render(tables[1], buf);
    } else {
        let rows: Vec<Row> = view.moods.iter().map(|m| present_mood_row(m, now)).collect();
        Table::new(
            rows,
            &[
                Constraint::Length(12),
                Constraint::Length(6),
                Constraint::Min(10),
                Constraint::Length(16),
            ],
        )
        .header(Row::new(vec!["Mood", "Level", "Note", "When"]).style(header_style))
        .block(Block::default().borders(Borders::ALL).title("Moods"))
        .render(tables[1], buf);
    }

    render_instructions(chunks[2], buf);
}

fn empty_panel<'a>(title: &'a str, text: &'a str) -> Paragraph<'a> {
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
}

fn render_instructions(area: Rect, buf: &mut Buffer) {
    Paragraph::new("(b)ack / (esc)ape")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .render(area, buf);
}
