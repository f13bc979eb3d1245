use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use exhale::app::{AppState, Flow};
use exhale::config::Config;
use exhale::history::HistoryDb;
use exhale::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use exhale::{App, BreathingSession, PhaseLabel, SessionStatus, TechniqueKind, TickOutcome};

// Headless integration using the internal runtime + App without a TTY.
// Each runner Tick advances a simulated clock by one second.
#[test]
fn headless_session_runs_to_completion() {
    let start = Instant::now();
    let db = HistoryDb::open_in_memory().unwrap();
    let mut app = App::new(&Config::default(), Some(db), start);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let runner = Runner::new(es, ticker);

    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    let mut now = start;
    for _ in 0..200u32 {
        match runner.step() {
            AppEvent::Tick => {
                now += Duration::from_secs(1);
                app.on_tick(now);
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                assert_eq!(app.on_key(key, now), Flow::Continue);
            }
        }
        if app.state == AppState::Finished {
            break;
        }
    }

    assert_eq!(app.state, AppState::Finished);
    assert_eq!(app.status(), SessionStatus::Finished);
    let snap = app.session.snapshot();
    assert_eq!(snap.total_remaining_secs, 0);
    assert!(!snap.active);

    let sessions = app.history.as_ref().unwrap().recent_sessions(5).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].technique, TechniqueKind::BoxBreathing);
    assert_eq!(sessions[0].minutes, 1);
}

#[test]
fn headless_escape_cancels_session() {
    let start = Instant::now();
    let mut app = App::new(&Config::default(), None, start);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE)))
        .unwrap();

    let mut now = start;
    for _ in 0..10u32 {
        match runner.step() {
            AppEvent::Tick => {
                now += Duration::from_secs(1);
                app.on_tick(now);
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                app.on_key(key, now);
            }
        }
    }
    assert_eq!(app.state, AppState::Breathing);
    assert!(app.session.snapshot().total_remaining_secs < 60);

    app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), now);
    assert_eq!(app.state, AppState::Setup);
    assert_eq!(app.status(), SessionStatus::Idle);
    assert_eq!(app.session.snapshot().phase.label, PhaseLabel::Inhale);
}

#[test]
fn relaxing_breath_cycles_through_phases() {
    let mut session = BreathingSession::new(TechniqueKind::Relaxing478.technique());
    session
        .start(1, TechniqueKind::Relaxing478.technique())
        .unwrap();

    let mut labels = vec![session.current_phase().label];
    let mut outcomes = vec![];
    for _ in 0..60 {
        outcomes.push(session.tick());
        let label = session.current_phase().label;
        if labels.last() != Some(&label) {
            labels.push(label);
        }
    }

    // 60 seconds of 4+7+8 cycles: three full rounds and a partial fourth
    assert_eq!(
        &labels[..4],
        &[
            PhaseLabel::Inhale,
            PhaseLabel::Hold,
            PhaseLabel::Exhale,
            PhaseLabel::Inhale
        ]
    );
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == TickOutcome::Finished)
            .count(),
        1
    );
    assert_eq!(outcomes.last(), Some(&TickOutcome::Finished));
    assert_eq!(session.tick(), TickOutcome::Ignored);
}
