use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::breathing::{BreathingSession, SessionStatus, TickOutcome};
use crate::config::Config;
use crate::history::{HistoryDb, SessionRecord, SessionSummary};
use crate::mood::{positive_streak, MoodLog, MoodSummary};
use crate::runtime::SecondClock;
use crate::technique::TechniqueKind;

const HISTORY_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Breathing,
    Finished,
    History,
}

/// Whether the event loop should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the history screen shows, loaded when the screen opens
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub sessions: Vec<SessionRecord>,
    pub session_summary: SessionSummary,
    pub moods: Vec<MoodLog>,
    pub mood_summary: Option<MoodSummary>,
    pub positive_streak: usize,
}

impl HistoryView {
    pub fn load(db: &HistoryDb) -> Result<Self, crate::error::HistoryError> {
        let all_moods = db.all_moods()?;
        let mood_summary = (!all_moods.is_empty()).then(|| MoodSummary::from_logs(&all_moods));
        Ok(Self {
            sessions: db.recent_sessions(HISTORY_ROWS)?,
            session_summary: db.session_summary()?,
            positive_streak: positive_streak(&all_moods),
            moods: all_moods.into_iter().take(HISTORY_ROWS).collect(),
            mood_summary,
        })
    }
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub session: BreathingSession,
    pub technique: TechniqueKind,
    pub length_choices: Vec<u32>,
    pub selected_length: usize,
    pub history: Option<HistoryDb>,
    pub history_view: Option<HistoryView>,
    pub last_error: Option<String>,
    clock: SecondClock,
}

impl App {
    pub fn new(config: &Config, history: Option<HistoryDb>, now: Instant) -> Self {
        let config = config.clone().sanitized();
        let mut length_choices = config.length_choices;
        if !length_choices.contains(&config.session_minutes) {
            length_choices.push(config.session_minutes);
            length_choices.sort_unstable();
        }
        let selected_length = length_choices
            .iter()
            .position(|m| *m == config.session_minutes)
            .unwrap_or(0);

        Self {
            state: AppState::Setup,
            session: BreathingSession::new(config.technique.technique()),
            technique: config.technique,
            length_choices,
            selected_length,
            history,
            history_view: None,
            last_error: None,
            clock: SecondClock::new(now),
        }
    }

    pub fn selected_minutes(&self) -> u32 {
        self.length_choices[self.selected_length]
    }

    pub fn select_technique(&mut self, kind: TechniqueKind) {
        self.technique = kind;
        self.session.select_technique(kind.technique());
    }

    pub fn start_session(&mut self, now: Instant) {
        let minutes = self.selected_minutes();
        match self.session.start(minutes, self.technique.technique()) {
            Ok(()) => {
                self.last_error = None;
                self.clock.restart(now);
                self.state = AppState::Breathing;
            }
            Err(e) => {
                warn!(error = %e, "could not start session");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Cancel a running session, or leave the completion screen
    pub fn end_session(&mut self) {
        self.session.reset();
        self.state = AppState::Setup;
    }

    /// Feed elapsed wall time to the session. Returns true if anything changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.state != AppState::Breathing {
            return false;
        }

        let secs = self.clock.take_elapsed_secs(now);
        for _ in 0..secs {
            if self.session.tick() == TickOutcome::Finished {
                self.on_finished();
                break;
            }
        }
        secs > 0
    }

    fn on_finished(&mut self) {
        self.state = AppState::Finished;
        let Some(db) = &self.history else {
            return;
        };
        let record = SessionRecord::completed_now(self.technique, self.session.total_minutes());
        if let Err(e) = db.record_session(&record) {
            warn!(error = %e, "could not record finished session");
        }
    }

    pub fn open_history(&mut self) {
        self.history_view = match &self.history {
            Some(db) => match HistoryView::load(db) {
                Ok(view) => Some(view),
                Err(e) => {
                    warn!(error = %e, "could not load history");
                    self.last_error = Some(e.to_string());
                    None
                }
            },
            None => None,
        };
        self.state = AppState::History;
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.state {
            AppState::Setup => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Left => self.select_technique(self.technique.prev()),
                KeyCode::Right | KeyCode::Tab => self.select_technique(self.technique.next()),
                KeyCode::Up => {
                    self.selected_length = self.selected_length.saturating_sub(1);
                }
                KeyCode::Down => {
                    self.selected_length =
                        (self.selected_length + 1).min(self.length_choices.len() - 1);
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.start_session(now),
                KeyCode::Char('h') => self.open_history(),
                KeyCode::Char(c) => {
                    // number keys pick a preset length and start right away
                    if let Some(idx) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                        if idx < self.length_choices.len() {
                            self.selected_length = idx;
                            self.start_session(now);
                        }
                    }
                }
                _ => {}
            },
            AppState::Breathing => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    info!("session ended by user");
                    self.end_session();
                }
            }
            AppState::Finished => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char(' ') => self.end_session(),
                KeyCode::Char('h') => self.open_history(),
                _ => {}
            },
            AppState::History => match key.code {
                KeyCode::Esc
                | KeyCode::Backspace
                | KeyCode::Char('b')
                | KeyCode::Char('q') => {
                    self.history_view = None;
                    self.end_session();
                }
                _ => {}
            },
        }

        Flow::Continue
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }
}
