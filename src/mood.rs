use chrono::{DateTime, Local};
use clap::ValueEnum;
use itertools::Itertools;

use crate::error::HistoryError;
use crate::util::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Anxious,
    Tired,
    Angry,
    Neutral,
}

impl Mood {
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Anxious => "😟",
            Mood::Tired => "😴",
            Mood::Angry => "😠",
            Mood::Neutral => "😐",
        }
    }

    /// Moods that count towards a calm streak
    pub fn is_positive(self) -> bool {
        matches!(self, Mood::Happy | Mood::Neutral)
    }
}

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 5;

/// One mood check-in
#[derive(Debug, Clone, PartialEq)]
pub struct MoodLog {
    pub mood: Mood,
    pub intensity: u8,
    pub note: Option<String>,
    pub logged_at: DateTime<Local>,
}

impl MoodLog {
    pub fn new(mood: Mood, intensity: u8, note: Option<String>) -> Result<Self, HistoryError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) {
            return Err(HistoryError::InvalidIntensity(intensity));
        }
        Ok(Self {
            mood,
            intensity,
            // blank notes are not worth keeping
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            logged_at: Local::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodSummary {
    pub total_logs: usize,
    pub average_intensity: Option<f64>,
    /// Most frequent first; ties broken by mood order
    pub counts: Vec<(Mood, usize)>,
}

impl MoodSummary {
    pub fn from_logs(logs: &[MoodLog]) -> Self {
        let intensities: Vec<f64> = logs.iter().map(|l| l.intensity as f64).collect();
        let counts = logs
            .iter()
            .map(|l| l.mood)
            .counts()
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
            .collect();

        Self {
            total_logs: logs.len(),
            average_intensity: mean(&intensities),
            counts,
        }
    }

    pub fn most_frequent(&self) -> Option<Mood> {
        self.counts.first().map(|(mood, _)| *mood)
    }
}

/// Consecutive positive check-ins, counting back from the newest log.
///
/// `logs` may be in any order.
pub fn positive_streak(logs: &[MoodLog]) -> usize {
    logs.iter()
        .sorted_by(|a, b| b.logged_at.cmp(&a.logged_at))
        .take_while(|l| l.mood.is_positive())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn log(mood: Mood, intensity: u8, minutes_ago: i64) -> MoodLog {
        MoodLog {
            mood,
            intensity,
            note: None,
            logged_at: Local::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_intensity_bounds() {
        assert!(MoodLog::new(Mood::Happy, 1, None).is_ok());
        assert!(MoodLog::new(Mood::Happy, 5, None).is_ok());
        assert_matches!(
            MoodLog::new(Mood::Sad, 0, None),
            Err(HistoryError::InvalidIntensity(0))
        );
        assert_matches!(
            MoodLog::new(Mood::Sad, 6, None),
            Err(HistoryError::InvalidIntensity(6))
        );
    }

    #[test]
    fn test_blank_note_dropped() {
        let entry = MoodLog::new(Mood::Tired, 3, Some("   ".into())).unwrap();
        assert_eq!(entry.note, None);
        let entry = MoodLog::new(Mood::Tired, 3, Some(" long day ".into())).unwrap();
        assert_eq!(entry.note.as_deref(), Some("long day"));
    }

    #[test]
    fn test_summary_counts_and_average() {
        let logs = vec![
            log(Mood::Anxious, 4, 30),
            log(Mood::Happy, 2, 20),
            log(Mood::Anxious, 5, 10),
            log(Mood::Tired, 1, 5),
        ];
        let summary = MoodSummary::from_logs(&logs);

        assert_eq!(summary.total_logs, 4);
        assert_eq!(summary.average_intensity, Some(3.0));
        assert_eq!(
            summary.counts,
            vec![(Mood::Anxious, 2), (Mood::Happy, 1), (Mood::Tired, 1)]
        );
        assert_eq!(summary.most_frequent(), Some(Mood::Anxious));
    }

    #[test]
    fn test_summary_empty() {
        let summary = MoodSummary::from_logs(&[]);
        assert_eq!(summary.total_logs, 0);
        assert_eq!(summary.average_intensity, None);
        assert!(summary.counts.is_empty());
        assert_eq!(summary.most_frequent(), None);
    }

    #[test]
    fn test_positive_streak() {
        let logs = vec![
            log(Mood::Happy, 3, 1),
            log(Mood::Sad, 3, 50),
            log(Mood::Neutral, 3, 10),
            log(Mood::Happy, 3, 100),
        ];
        assert_eq!(positive_streak(&logs), 2);
        assert_eq!(positive_streak(&[]), 0);
    }

    #[test]
    fn test_mood_names() {
        assert_eq!(Mood::Anxious.to_string(), "anxious");
        assert_eq!(Mood::from_str("tired", true), Ok(Mood::Tired));
    }
}
