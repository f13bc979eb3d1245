use chrono::{DateTime, Local};
use rand::seq::SliceRandom;

use crate::error::HistoryError;

/// Shortest reflection worth saving, counted in characters after trimming
pub const MIN_CONTENT_CHARS: usize = 10;

pub const PROMPTS: &[&str] = &[
    "What made you feel a burst of joy today?",
    "Write about a small win you had this week.",
    "Describe a moment of unexpected kindness.",
    "What are you most proud of today?",
    "What's a small step you can take towards a big dream?",
];

/// A prompt picked at random, for when the user doesn't name one
pub fn random_prompt() -> &'static str {
    PROMPTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PROMPTS[0])
}

/// Look up a prompt by its 1-based number as shown by `exhale journal`
pub fn prompt_by_number(number: usize) -> Result<&'static str, HistoryError> {
    number
        .checked_sub(1)
        .and_then(|idx| PROMPTS.get(idx))
        .copied()
        .ok_or(HistoryError::UnknownPrompt(number))
}

/// A prompted reflection
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub prompt: String,
    pub content: String,
    pub written_at: DateTime<Local>,
}

impl JournalEntry {
    pub fn new(prompt: impl Into<String>, content: &str) -> Result<Self, HistoryError> {
        let content = content.trim();
        let got = content.chars().count();
        if got < MIN_CONTENT_CHARS {
            return Err(HistoryError::EntryTooShort {
                min: MIN_CONTENT_CHARS,
                got,
            });
        }
        Ok(Self {
            prompt: prompt.into(),
            content: content.to_string(),
            written_at: Local::now(),
        })
    }

    /// First line of the content, cut to `max` characters
    pub fn excerpt(&self, max: usize) -> String {
        let line = self.content.lines().next().unwrap_or_default();
        if line.chars().count() <= max && !self.content.contains('\n') {
            return line.to_string();
        }
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut.trim_end())
    }
}
