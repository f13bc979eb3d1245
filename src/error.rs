use thiserror::Error;

/// Configuration errors raised when building a technique or starting a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreathingError {
    #[error("a technique needs at least one phase")]
    EmptyTechnique,

    #[error("phase {index} of '{technique}' has a zero duration")]
    InvalidPhaseDuration { technique: String, index: usize },

    #[error("session length must be a positive number of minutes (got {0})")]
    InvalidDuration(u32),
}

/// Errors from the local history store
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not create history directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("no history location could be resolved")]
    NoLocation,

    #[error("mood intensity must be between 1 and 5 (got {0})")]
    InvalidIntensity(u8),

    #[error("journal entries need at least {min} characters (got {got})")]
    EntryTooShort { min: usize, got: usize },

    #[error("no journal prompt number {0}")]
    UnknownPrompt(usize),

    #[error("unreadable {column} value '{value}' in history")]
    Corrupt { column: &'static str, value: String },
}
