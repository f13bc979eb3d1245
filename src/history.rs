use chrono::{DateTime, Local, SecondsFormat, Utc};
use clap::ValueEnum;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info};

use crate::app_dirs::AppDirs;
use crate::error::HistoryError;
use crate::journal::JournalEntry;
use crate::mood::{Mood, MoodLog, MoodSummary};
use crate::technique::TechniqueKind;

/// A completed breathing session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub technique: TechniqueKind,
    pub minutes: u32,
    pub completed_at: DateTime<Local>,
}

impl SessionRecord {
    pub fn completed_now(technique: TechniqueKind, minutes: u32) -> Self {
        Self {
            technique,
            minutes,
            completed_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSummary {
    pub total_sessions: u64,
    pub total_minutes: u64,
    /// Sessions per technique, most used first
    pub by_technique: Vec<(TechniqueKind, u64)>,
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS breathing_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        technique TEXT NOT NULL,
        minutes INTEGER NOT NULL,
        completed_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_breathing_sessions_completed
        ON breathing_sessions(completed_at);

    CREATE TABLE IF NOT EXISTS mood_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        mood TEXT NOT NULL,
        intensity INTEGER NOT NULL,
        note TEXT,
        logged_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mood_logs_logged ON mood_logs(logged_at);

    CREATE TABLE IF NOT EXISTS journal_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        prompt TEXT NOT NULL,
        content TEXT NOT NULL,
        written_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_journal_entries_written ON journal_entries(written_at);
"#;

/// Local store for completed sessions, mood check-ins and journal entries
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database under the state dir, creating it if needed
    pub fn open_default() -> Result<Self, HistoryError> {
        let path = AppDirs::db_path().ok_or(HistoryError::NoLocation)?;
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened history database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn record_session(&self, record: &SessionRecord) -> Result<(), HistoryError> {
        self.conn.execute(
            "INSERT INTO breathing_sessions (technique, minutes, completed_at) VALUES (?1, ?2, ?3)",
            params![
                record.technique.to_string(),
                record.minutes,
                stored_timestamp(&record.completed_at),
            ],
        )?;
        info!(technique = %record.technique, minutes = record.minutes, "session recorded");
        Ok(())
    }

    /// Most recent sessions first
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT technique, minutes, completed_at
            FROM breathing_sessions
            ORDER BY completed_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([sql_limit(limit)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (technique, minutes, completed_at) = row?;
            records.push(SessionRecord {
                technique: parse_technique(&technique)?,
                minutes,
                completed_at: parse_timestamp(&completed_at)?,
            });
        }
        Ok(records)
    }

    pub fn session_summary(&self) -> Result<SessionSummary, HistoryError> {
        let (total_sessions, total_minutes): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(minutes), 0) FROM breathing_sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT technique, COUNT(*) AS n
            FROM breathing_sessions
            GROUP BY technique
            ORDER BY n DESC, technique
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut by_technique = Vec::new();
        for row in rows {
            let (technique, count) = row?;
            by_technique.push((parse_technique(&technique)?, count as u64));
        }

        Ok(SessionSummary {
            total_sessions: total_sessions as u64,
            total_minutes: total_minutes as u64,
            by_technique,
        })
    }

    pub fn record_mood(&self, entry: &MoodLog) -> Result<(), HistoryError> {
        self.conn.execute(
            "INSERT INTO mood_logs (mood, intensity, note, logged_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.mood.to_string(),
                entry.intensity,
                entry.note,
                stored_timestamp(&entry.logged_at),
            ],
        )?;
        info!(mood = %entry.mood, intensity = entry.intensity, "mood logged");
        Ok(())
    }

    /// Most recent check-ins first
    pub fn recent_moods(&self, limit: usize) -> Result<Vec<MoodLog>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT mood, intensity, note, logged_at
            FROM mood_logs
            ORDER BY logged_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([sql_limit(limit)], mood_row)?;

        let mut logs = Vec::new();
        for row in rows {
            let (mood, intensity, note, logged_at) = row?;
            logs.push(MoodLog {
                mood: Mood::from_str(&mood, true).map_err(|_| HistoryError::Corrupt {
                    column: "mood",
                    value: mood.clone(),
                })?,
                intensity,
                note,
                logged_at: parse_timestamp(&logged_at)?,
            });
        }
        Ok(logs)
    }

    pub fn all_moods(&self) -> Result<Vec<MoodLog>, HistoryError> {
        self.recent_moods(usize::MAX)
    }

    pub fn mood_summary(&self) -> Result<MoodSummary, HistoryError> {
        Ok(MoodSummary::from_logs(&self.all_moods()?))
    }

    pub fn record_journal(&self, entry: &JournalEntry) -> Result<(), HistoryError> {
        self.conn.execute(
            "INSERT INTO journal_entries (prompt, content, written_at) VALUES (?1, ?2, ?3)",
            params![entry.prompt, entry.content, stored_timestamp(&entry.written_at)],
        )?;
        info!(chars = entry.content.chars().count(), "journal entry saved");
        Ok(())
    }

    /// Most recent entries first
    pub fn recent_journal(&self, limit: usize) -> Result<Vec<JournalEntry>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT prompt, content, written_at
            FROM journal_entries
            ORDER BY written_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([sql_limit(limit)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (prompt, content, written_at) = row?;
            entries.push(JournalEntry {
                prompt,
                content,
                written_at: parse_timestamp(&written_at)?,
            });
        }
        Ok(entries)
    }

    pub fn journal_count(&self) -> Result<u64, HistoryError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM journal_entries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Clear all history (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<(), HistoryError> {
        self.conn.execute_batch(
            "DELETE FROM breathing_sessions; DELETE FROM mood_logs; DELETE FROM journal_entries;",
        )?;
        info!("history cleared");
        Ok(())
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

type MoodRow = (String, u8, Option<String>, String);

fn mood_row(row: &Row<'_>) -> rusqlite::Result<MoodRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn parse_technique(value: &str) -> Result<TechniqueKind, HistoryError> {
    TechniqueKind::from_str(value, true).map_err(|_| HistoryError::Corrupt {
        column: "technique",
        value: value.to_string(),
    })
}

/// Fixed-width UTC so that `ORDER BY` on the text column is chronological
fn stored_timestamp(ts: &DateTime<Local>) -> String {
    ts.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Local>, HistoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Local))
        .map_err(|_| HistoryError::Corrupt {
            column: "timestamp",
            value: value.to_string(),
        })
}
