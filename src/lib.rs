// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds argument parsing and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod breathing;
pub mod config;
pub mod error;
pub mod history;
pub mod journal;
pub mod logging;
pub mod mood;
pub mod runtime;
pub mod technique;
pub mod ui;
pub mod util;

pub use app::App;
pub use breathing::{BreathingSession, SessionStatus, TickOutcome};
pub use error::{BreathingError, HistoryError};
pub use technique::{Phase, PhaseLabel, Technique, TechniqueKind};

/// How often the event loop wakes up to redraw, in milliseconds.
/// Session seconds are counted from wall time, not from wakeups.
pub const TICK_RATE_MS: u64 = 200;
