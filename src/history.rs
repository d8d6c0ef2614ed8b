use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::game::Completion;

/// One solved puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    pub puzzle: String,
    pub elapsed_seconds: u64,
    pub words: usize,
    pub completed_at: DateTime<Local>,
}

impl From<&Completion> for CompletionRecord {
    fn from(c: &Completion) -> Self {
        Self {
            puzzle: c.puzzle.clone(),
            elapsed_seconds: c.elapsed_seconds,
            words: c.words,
            completed_at: Local::now(),
        }
    }
}

/// Aggregates for one puzzle across all recorded solves.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSummary {
    pub puzzle: String,
    pub solves: i64,
    pub best_seconds: u64,
    pub avg_seconds: f64,
}

/// Solve history backed by SQLite.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at the default state path, creating it if needed.
    pub fn new() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("strands_history.db"));
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {e}")),
                )
            })?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS completions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                puzzle TEXT NOT NULL,
                elapsed_seconds INTEGER NOT NULL,
                words INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_completions_puzzle ON completions(puzzle)",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn record_completion(&self, record: &CompletionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO completions (puzzle, elapsed_seconds, words, completed_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.puzzle,
                record.elapsed_seconds,
                record.words,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn best_time(&self, puzzle: &str) -> Result<Option<u64>> {
        self.conn
            .query_row(
                "SELECT MIN(elapsed_seconds) FROM completions WHERE puzzle = ?1",
                [puzzle],
                |row| row.get::<_, Option<u64>>(0),
            )
            .optional()
            .map(Option::flatten)
    }

    pub fn summary(&self) -> Result<Vec<PuzzleSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT puzzle, COUNT(*), MIN(elapsed_seconds), AVG(elapsed_seconds)
            FROM completions
            GROUP BY puzzle
            ORDER BY puzzle
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PuzzleSummary {
                puzzle: row.get(0)?,
                solves: row.get(1)?,
                best_seconds: row.get(2)?,
                avg_seconds: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    /// Most recent solves first.
    pub fn recent(&self, limit: usize) -> Result<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT puzzle, elapsed_seconds, words, completed_at
            FROM completions
            ORDER BY completed_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([limit], |row| {
            let stamp: String = row.get(3)?;
            let completed_at = DateTime::parse_from_rfc3339(&stamp)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Local);
            Ok(CompletionRecord {
                puzzle: row.get(0)?,
                elapsed_seconds: row.get(1)?,
                words: row.get(2)?,
                completed_at,
            })
        })?;
        rows.collect()
    }

    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM completions", [])?;
        Ok(())
    }
}
