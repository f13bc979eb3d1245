pub mod breath;
pub mod history;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Gauge, Paragraph, Widget, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::AppState,
    technique::{PhaseLabel, TechniqueKind},
    util::format_clock,
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn phase_color(label: PhaseLabel) -> Color {
    match label {
        PhaseLabel::Inhale => Color::Cyan,
        PhaseLabel::Hold => Color::Magenta,
        PhaseLabel::Exhale => Color::Blue,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Setup => render_setup(self, area, buf),
            AppState::Breathing => render_breathing(self, area, buf),
            AppState::Finished => render_finished(self, area, buf),
            AppState::History => history::render_history(self, area, buf),
        }
    }
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let selected_style = Style::default()
        .patch(bold_style)
        .fg(Color::Black)
        .bg(Color::Cyan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),    // padding
            Constraint::Length(2), // title
            Constraint::Length(2), // description
            Constraint::Length(1), // technique picker
            Constraint::Length(2), // phases of the selected technique
            Constraint::Length(1), // length picker
            Constraint::Length(2), // error
            Constraint::Min(0),    // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Breathe",
        Style::default().patch(bold_style).fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "Choose a technique and a session length, then follow the circle.",
        dim_style,
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[2], buf);

    let mut techniques = vec![];
    for (i, kind) in TechniqueKind::ALL.iter().enumerate() {
        if i > 0 {
            techniques.push(Span::raw("   "));
        }
        let style = if *kind == app.technique {
            selected_style
        } else {
            dim_style
        };
        techniques.push(Span::styled(format!(" {} ", kind.display_name()), style));
    }
    Paragraph::new(Line::from(techniques))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        breath::describe_phases(app.session.technique()),
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    let mut lengths = vec![];
    for (i, minutes) in app.length_choices.iter().enumerate() {
        if i > 0 {
            lengths.push(Span::raw("  "));
        }
        let label = format!(" ({}) {} min ", i + 1, minutes);
        let style = if i == app.selected_length {
            selected_style
        } else {
            bold_style
        };
        lengths.push(Span::styled(label, style));
    }
    Paragraph::new(Line::from(lengths))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    if let Some(err) = &app.last_error {
        Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    Paragraph::new(Span::styled(
        "←/→ technique / ↑/↓ length / (enter) start / (h)istory / (esc)ape",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[8], buf);
}

fn render_breathing(app: &App, area: Rect, buf: &mut Buffer) {
    let snap = app.session.snapshot();
    let state = app.session.state();
    let color = phase_color(snap.phase.label);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // technique name
            Constraint::Min(6),    // circle
            Constraint::Length(1), // phase label
            Constraint::Length(2), // phase countdown
            Constraint::Length(1), // time remaining caption
            Constraint::Length(2), // time remaining
            Constraint::Length(1), // progress
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(snap.technique, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let level = breath::breath_level(
        app.session.technique(),
        state.phase_index,
        state.phase_remaining_secs,
    );
    // terminal cells are roughly twice as tall as wide
    let circle_area = square_ish(chunks[1]);
    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: level * 0.95,
                color,
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: breath::MIN_LEVEL * 0.95,
                color: Color::DarkGray,
            });
        })
        .render(circle_area, buf);

    Paragraph::new(Span::styled(
        snap.phase.label.to_string(),
        Style::default().patch(bold_style).fg(color),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        snap.phase_remaining_secs.to_string(),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "time remaining",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        format_clock(snap.total_remaining_secs),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Reset))
        .ratio(snap.progress())
        .label("")
        .use_unicode(true)
        .render(chunks[6], buf);

    Paragraph::new(Span::styled(
        "(esc) end session",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[8], buf);
}

/// Shrink `area` horizontally so a canvas circle looks round
fn square_ish(area: Rect) -> Rect {
    let width = (area.height.saturating_mul(2)).min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

pub fn finished_message(minutes: u32) -> String {
    format!("You completed a {minutes}-minute breathing session.")
}

fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let message = finished_message(app.session.total_minutes());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "★  Well done  ★",
        Style::default().patch(bold_style).fg(Color::Yellow),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    // long messages wrap instead of being clipped on narrow terminals
    let wrap = message.width() > chunks[2].width as usize;
    let mut paragraph = Paragraph::new(Span::styled(message, bold_style)).alignment(Alignment::Center);
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: true });
    }
    paragraph.render(chunks[2], buf);

    Paragraph::new(Span::styled(
        app.session.technique().name(),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(enter) start another / (h)istory / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
