use tracing::{debug, info};

use crate::error::BreathingError;
use crate::technique::{Phase, Technique};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Finished,
}

/// What a single `tick` did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session was not running; nothing changed
    Ignored,
    Running,
    /// This tick exhausted the session. Reported once per start.
    Finished,
}

/// Counters of one breathing session, advanced by [`SessionState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub total_remaining_secs: u32,
    pub phase_index: usize,
    pub phase_remaining_secs: u32,
    pub active: bool,
    pub finished: bool,
}

impl SessionState {
    pub fn idle(technique: &Technique) -> Self {
        Self {
            total_remaining_secs: 0,
            phase_index: 0,
            phase_remaining_secs: technique.first().duration_secs,
            active: false,
            finished: false,
        }
    }

    pub fn started(total_minutes: u32, technique: &Technique) -> Result<Self, BreathingError> {
        let total_secs = total_secs(total_minutes)?;
        Ok(Self {
            total_remaining_secs: total_secs,
            phase_index: 0,
            phase_remaining_secs: technique.first().duration_secs,
            active: true,
            finished: false,
        })
    }

    /// Advance by one second.
    ///
    /// The phase step runs before the completion check, so the final tick
    /// of a session may already show the next phase.
    pub fn tick(self, technique: &Technique) -> Self {
        if !self.active {
            return self;
        }

        let mut next = self;
        next.total_remaining_secs = self.total_remaining_secs.saturating_sub(1);

        if self.phase_remaining_secs > 1 {
            next.phase_remaining_secs = self.phase_remaining_secs - 1;
        } else {
            next.phase_index = (self.phase_index + 1) % technique.len();
            next.phase_remaining_secs = technique.phase(next.phase_index).duration_secs;
        }

        if next.total_remaining_secs == 0 {
            next.active = false;
            next.finished = true;
        }

        next
    }

    pub fn status(&self) -> SessionStatus {
        match (self.active, self.finished) {
            (true, _) => SessionStatus::Running,
            (false, true) => SessionStatus::Finished,
            (false, false) => SessionStatus::Idle,
        }
    }
}

fn total_secs(total_minutes: u32) -> Result<u32, BreathingError> {
    if total_minutes == 0 {
        return Err(BreathingError::InvalidDuration(total_minutes));
    }
    total_minutes
        .checked_mul(60)
        .ok_or(BreathingError::InvalidDuration(total_minutes))
}

/// Read-only view handed to the renderer every frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot<'a> {
    pub technique: &'a str,
    pub phase: Phase,
    pub phase_remaining_secs: u32,
    pub total_remaining_secs: u32,
    pub total_secs: u32,
    pub active: bool,
    pub finished: bool,
}

impl SessionSnapshot<'_> {
    pub fn elapsed_secs(&self) -> u32 {
        self.total_secs.saturating_sub(self.total_remaining_secs)
    }

    /// Fraction of the session already breathed, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / self.total_secs as f64).clamp(0.0, 1.0)
    }
}

/// A guided-breathing session: one technique, one countdown.
///
/// The session never schedules its own ticks. Whoever owns it calls
/// [`BreathingSession::tick`] once per elapsed second.
#[derive(Debug, Clone)]
pub struct BreathingSession {
    technique: Technique,
    total_minutes: u32,
    state: SessionState,
}

impl BreathingSession {
    pub fn new(technique: Technique) -> Self {
        let state = SessionState::idle(&technique);
        Self {
            technique,
            total_minutes: 0,
            state,
        }
    }

    pub fn start(&mut self, total_minutes: u32, technique: Technique) -> Result<(), BreathingError> {
        let state = SessionState::started(total_minutes, &technique)?;
        info!(
            technique = technique.name(),
            total_minutes, "breathing session started"
        );
        self.technique = technique;
        self.total_minutes = total_minutes;
        self.state = state;
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.active {
            return TickOutcome::Ignored;
        }

        let before = self.state;
        self.state = before.tick(&self.technique);

        if self.state.phase_index != before.phase_index {
            debug!(
                phase = %self.current_phase().label,
                index = self.state.phase_index,
                "phase advanced"
            );
        }

        if self.state.finished {
            info!(
                technique = self.technique.name(),
                total_minutes = self.total_minutes,
                "breathing session finished"
            );
            TickOutcome::Finished
        } else {
            TickOutcome::Running
        }
    }

    pub fn reset(&mut self) {
        if self.state.active {
            debug!(
                remaining = self.state.total_remaining_secs,
                "breathing session ended early"
            );
        }
        self.state = SessionState::idle(&self.technique);
    }

    /// Swap the technique of an idle session. Resets any running state.
    pub fn select_technique(&mut self, technique: Technique) {
        self.technique = technique;
        self.total_minutes = 0;
        self.reset();
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn technique(&self) -> &Technique {
        &self.technique
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn current_phase(&self) -> Phase {
        self.technique.phase(self.state.phase_index)
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            technique: self.technique.name(),
            phase: self.current_phase(),
            phase_remaining_secs: self.state.phase_remaining_secs,
            total_remaining_secs: self.state.total_remaining_secs,
            total_secs: self.total_minutes.saturating_mul(60),
            active: self.state.active,
            finished: self.state.finished,
        }
    }
}
