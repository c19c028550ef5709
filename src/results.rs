use chrono::{DateTime, Local};
use rusqlite::{params, types::Type, Connection, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app_dirs::AppDirs;
use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// The fields of a completed quiz that get persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewResult {
    pub total: i64,
    pub correct: i64,
    pub avg_difficulty: f64,
    pub est_mean: i64,
    pub est_lo: i64,
    pub est_hi: i64,
}

/// A stored quiz result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub id: i64,
    pub user: String,
    pub total: i64,
    pub correct: i64,
    pub avg_difficulty: f64,
    pub est_mean: i64,
    pub est_lo: i64,
    pub est_hi: i64,
    pub created_at: DateTime<Local>,
}

impl ResultRecord {
    pub fn accuracy_percent(&self) -> i64 {
        if self.total > 0 {
            ((self.correct as f64 / self.total as f64) * 100.0).round() as i64
        } else {
            0
        }
    }
}

/// Persistence for finished quizzes
pub trait ResultStore {
    /// Persist a completed result for `user`, stamped with the current time
    fn create(&mut self, user: &str, result: &NewResult) -> Result<ResultRecord>;

    /// A user's results, oldest first
    fn list_for_user(&self, user: &str) -> Result<Vec<ResultRecord>>;
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT NOT NULL,
        total INTEGER NOT NULL,
        correct INTEGER NOT NULL,
        avg_difficulty REAL NOT NULL,
        est_mean INTEGER NOT NULL,
        est_lo INTEGER NOT NULL,
        est_hi INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_results_user_created ON results(user, created_at);
"#;

/// SQLite-backed result store
#[derive(Debug)]
pub struct SqliteResultStore {
    conn: Connection,
}

impl SqliteResultStore {
    /// Open the store at the default location, creating it if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("vokab_results.db"));
        Self::with_path(db_path)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        debug!(path = %path.display(), "opening result store");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Persist a result with an explicit timestamp
    pub fn create_at(
        &mut self,
        user: &str,
        result: &NewResult,
        created_at: DateTime<Local>,
    ) -> Result<ResultRecord> {
        self.conn.execute(
            r#"
            INSERT INTO results
            (user, total, correct, avg_difficulty, est_mean, est_lo, est_hi, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                user,
                result.total,
                result.correct,
                result.avg_difficulty,
                result.est_mean,
                result.est_lo,
                result.est_hi,
                created_at.to_rfc3339(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, user, est_mean = result.est_mean, "stored quiz result");

        Ok(ResultRecord {
            id,
            user: user.to_string(),
            total: result.total,
            correct: result.correct,
            avg_difficulty: result.avg_difficulty,
            est_mean: result.est_mean,
            est_lo: result.est_lo,
            est_hi: result.est_hi,
            created_at,
        })
    }
}

impl ResultStore for SqliteResultStore {
    fn create(&mut self, user: &str, result: &NewResult) -> Result<ResultRecord> {
        self.create_at(user, result, Local::now())
    }

    fn list_for_user(&self, user: &str) -> Result<Vec<ResultRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user, total, correct, avg_difficulty, est_mean, est_lo, est_hi, created_at
            FROM results
            WHERE user = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )?;

        let rows = stmt.query_map([user], read_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        // rfc3339 text sorts by wall clock only within one utc offset
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<ResultRecord> {
    let created_at: String = row.get(8)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
        .with_timezone(&Local);

    Ok(ResultRecord {
        id: row.get(0)?,
        user: row.get(1)?,
        total: row.get(2)?,
        correct: row.get(3)?,
        avg_difficulty: row.get(4)?,
        est_mean: row.get(5)?,
        est_lo: row.get(6)?,
        est_hi: row.get(7)?,
        created_at,
    })
}

/// Write records as CSV with a header row
pub fn export_csv<P: AsRef<Path>>(records: &[ResultRecord], path: P) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(rows = records.len(), path = %path.as_ref().display(), "exported history");
    Ok(records.len())
}
