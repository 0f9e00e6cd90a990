//! SQLite cache of daily activity.
//!
//! Provides persistent storage for:
//! - The most recently fetched health samples, keyed by calendar date
//! - Today's locally counted steps (key-value table)

use chrono::{Days, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::activity::HealthSample;
use crate::error::StorageError;

use super::{data_dir, migrations};

const DB_FILE: &str = "activity.db";
const TODAY_STEPS_KEY: &str = "today_steps";

#[derive(Debug, Serialize, Deserialize)]
struct TodaySteps {
    date: NaiveDate,
    steps: u64,
}

/// Local activity cache.
pub struct ActivityDb {
    conn: Connection,
}

impl ActivityDb {
    /// Open the database at `~/.config/fittrack/activity.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join(DB_FILE))
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (tests and dry runs).
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Cache samples that carry a date; undated samples are skipped.
    ///
    /// Returns the number of rows written.
    pub fn upsert_samples(&self, samples: &[HealthSample]) -> Result<usize, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO daily_activity (date, day_label, steps, calories, distance, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(date) DO UPDATE SET
                    day_label = excluded.day_label,
                    steps = excluded.steps,
                    calories = excluded.calories,
                    distance = excluded.distance,
                    updated_at = excluded.updated_at",
            )?;
            for sample in samples {
                let Some(date) = sample.calendar_date() else {
                    continue;
                };
                stmt.execute(params![
                    ymd(date),
                    sample.day,
                    sample.steps.unwrap_or(0) as i64,
                    sample.calories_burned.unwrap_or(0.0),
                    sample.distance.unwrap_or(0.0),
                    now,
                ])?;
                written += 1;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Cached samples from the last `days` days (today included), newest
    /// first.
    pub fn recent(&self, days: u32) -> Result<Vec<HealthSample>, StorageError> {
        self.recent_until(Local::now().date_naive(), days)
    }

    fn recent_until(&self, today: NaiveDate, days: u32) -> Result<Vec<HealthSample>, StorageError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let oldest = today
            .checked_sub_days(Days::new(u64::from(days) - 1))
            .unwrap_or(NaiveDate::MIN);
        let mut stmt = self.conn.prepare(
            "SELECT date, day_label, steps, calories, distance
             FROM daily_activity
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![ymd(oldest), ymd(today)], |row| {
            Ok(HealthSample {
                date: Some(row.get::<_, String>(0)?),
                day: row.get::<_, Option<String>>(1)?,
                steps: Some(row.get::<_, i64>(2)?.max(0) as u64),
                calories_burned: Some(row.get(3)?),
                distance: Some(row.get(4)?),
            })
        })?;
        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?);
        }
        Ok(samples)
    }

    /// Steps counted locally today, if any were recorded.
    pub fn today_steps(&self) -> Result<Option<u64>, StorageError> {
        self.steps_on(Local::now().date_naive())
    }

    pub fn set_today_steps(&self, steps: u64) -> Result<(), StorageError> {
        self.set_steps_on(Local::now().date_naive(), steps)
    }

    fn steps_on(&self, date: NaiveDate) -> Result<Option<u64>, StorageError> {
        let Some(raw) = self.kv_get(TODAY_STEPS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<TodaySteps>(&raw) {
            Ok(entry) if entry.date == date => Ok(Some(entry.steps)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed today_steps entry");
                Ok(None)
            }
        }
    }

    fn set_steps_on(&self, date: NaiveDate, steps: u64) -> Result<(), StorageError> {
        let value = serde_json::to_string(&TodaySteps { date, steps })
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.kv_set(TODAY_STEPS_KEY, &value)
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
