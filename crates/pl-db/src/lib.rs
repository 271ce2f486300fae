//! Storage layer for punchlog.
//!
//! Persists the record store's four collections (punches, leaves, holidays,
//! weekly-off weekdays) and two config structs (goals, leave limits) using
//! `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` can be moved between threads but cannot be
//! shared without external synchronization. The engine is single-threaded,
//! so no pooling is needed.
//!
//! # Schema
//!
//! Punch timestamps are stored as INTEGER epoch milliseconds, matching the
//! backup wire format exactly. Calendar days are canonical `YYYY-MM-DD` TEXT
//! keys with UNIQUE constraints echoing the ledger invariants. The two
//! config structs live as JSON documents in a key/value `settings` table.
//!
//! Every write replaces a whole collection (delete-then-insert inside one
//! transaction); there is no incremental append path. [`Database`] implements
//! [`pl_core::Store`], with [`Store::replace_all`] as a single transaction so
//! an interrupted import cannot leave mixed old/new state.

use std::path::Path;

use chrono::TimeZone;
use rusqlite::{Connection, Transaction, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use pl_core::{
    DayKey, Goals, HolidayRecord, LeaveLimits, LeaveRecord, PunchEvent, RecordId, Snapshot, Store,
    WeekdaySet,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored value failed domain validation on the way out.
    #[error("invalid stored record: {0}")]
    Invalid(#[from] pl_core::ValidationError),
    /// A stored punch timestamp is outside the representable range.
    #[error("invalid timestamp for punch {id}: {timestamp_ms}")]
    TimestampRange { id: String, timestamp_ms: i64 },
    /// A settings document failed to encode or decode.
    #[error("invalid settings document for {key}")]
    Settings {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for schema and thread safety notes.
pub struct Database {
    conn: Connection,
}

const GOALS_KEY: &str = "goals";
const LEAVE_LIMITS_KEY: &str = "leave_limits";
const WEEKLY_HOLIDAYS_SET_KEY: &str = "weekly_holidays_set";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Punch log: seq preserves insertion (= punch) order
            -- timestamp_ms: epoch milliseconds, as in the backup format
            CREATE TABLE IF NOT EXISTS punches (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                timestamp_ms INTEGER NOT NULL,
                kind TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_punches_timestamp ON punches(timestamp_ms);

            CREATE TABLE IF NOT EXISTS leaves (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL UNIQUE,
                kind TEXT NOT NULL,
                note TEXT
            );

            CREATE TABLE IF NOT EXISTS holidays (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL UNIQUE,
                note TEXT
            );

            CREATE TABLE IF NOT EXISTS weekly_holidays (
                weekday INTEGER PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6)
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Loads the full stored state, applying defaults where nothing is stored.
    pub fn load_snapshot(&self) -> Result<Snapshot, DbError> {
        Ok(Snapshot {
            events: self.list_events()?,
            leaves: self.list_leaves()?,
            holidays: self.list_holidays()?,
            weekly_holidays: self.weekly_holidays()?,
            goals: self
                .read_setting(GOALS_KEY)?
                .unwrap_or_default(),
            leave_limits: self
                .read_setting(LEAVE_LIMITS_KEY)?
                .unwrap_or_default(),
        })
    }

    /// Lists the punch log in insertion order.
    pub fn list_events(&self) -> Result<Vec<PunchEvent>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, timestamp_ms, kind FROM punches ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut events = Vec::new();
        for row in rows {
            let (id, timestamp_ms, kind) = row?;
            let timestamp = chrono::Utc
                .timestamp_millis_opt(timestamp_ms)
                .single()
                .ok_or(DbError::TimestampRange {
                    id: id.clone(),
                    timestamp_ms,
                })?;
            events.push(PunchEvent {
                id: RecordId::new(id)?,
                timestamp,
                kind: kind.parse()?,
            });
        }
        Ok(events)
    }

    /// Lists leave records ordered by date.
    pub fn list_leaves(&self) -> Result<Vec<LeaveRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, kind, note FROM leaves ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut leaves = Vec::new();
        for row in rows {
            let (id, date, kind, note) = row?;
            leaves.push(LeaveRecord {
                id: RecordId::new(id)?,
                date: DayKey::new(date)?,
                kind: kind.parse()?,
                note,
            });
        }
        Ok(leaves)
    }

    /// Lists holiday records ordered by date.
    pub fn list_holidays(&self) -> Result<Vec<HolidayRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, note FROM holidays ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        let mut holidays = Vec::new();
        for row in rows {
            let (id, date, note) = row?;
            holidays.push(HolidayRecord {
                id: RecordId::new(id)?,
                date: DayKey::new(date)?,
                note,
            });
        }
        Ok(holidays)
    }

    /// Reads the weekly-off set, defaulting when nothing is stored.
    ///
    /// An explicitly stored empty set is indistinguishable from absent data
    /// here; the engine treats both as the default. A sentinel settings row
    /// distinguishes a deliberate empty set.
    pub fn weekly_holidays(&self) -> Result<WeekdaySet, DbError> {
        let stored: Option<bool> = self.read_setting(WEEKLY_HOLIDAYS_SET_KEY)?;
        let mut stmt = self
            .conn
            .prepare("SELECT weekday FROM weekly_holidays ORDER BY weekday ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, u8>(0))?;
        let mut days = Vec::new();
        for row in rows {
            days.push(row?);
        }
        if days.is_empty() && stored != Some(true) {
            return Ok(WeekdaySet::default());
        }
        Ok(WeekdaySet::new(days)?)
    }

    fn read_setting<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, DbError> {
        let mut stmt = self.conn.prepare("SELECT value FROM settings WHERE key = ?")?;
        let mut rows = stmt.query_map([key], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => {
                let value = row?;
                let parsed = serde_json::from_str(&value)
                    .map_err(|source| DbError::Settings { key, source })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    fn write_setting<T: Serialize>(
        tx: &Transaction<'_>,
        key: &'static str,
        value: &T,
    ) -> Result<(), DbError> {
        let encoded =
            serde_json::to_string(value).map_err(|source| DbError::Settings { key, source })?;
        tx.execute(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, encoded],
        )?;
        Ok(())
    }

    fn write_events(tx: &Transaction<'_>, events: &[PunchEvent]) -> Result<(), DbError> {
        tx.execute("DELETE FROM punches", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO punches (id, timestamp_ms, kind) VALUES (?, ?, ?)")?;
        for event in events {
            stmt.execute(params![
                event.id.as_str(),
                event.timestamp.timestamp_millis(),
                event.kind.as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_leaves(tx: &Transaction<'_>, leaves: &[LeaveRecord]) -> Result<(), DbError> {
        tx.execute("DELETE FROM leaves", [])?;
        let mut stmt = tx.prepare("INSERT INTO leaves (id, date, kind, note) VALUES (?, ?, ?, ?)")?;
        for leave in leaves {
            stmt.execute(params![
                leave.id.as_str(),
                leave.date.as_str(),
                leave.kind.as_str(),
                leave.note,
            ])?;
        }
        Ok(())
    }

    fn write_holidays(tx: &Transaction<'_>, holidays: &[HolidayRecord]) -> Result<(), DbError> {
        tx.execute("DELETE FROM holidays", [])?;
        let mut stmt = tx.prepare("INSERT INTO holidays (id, date, note) VALUES (?, ?, ?)")?;
        for holiday in holidays {
            stmt.execute(params![
                holiday.id.as_str(),
                holiday.date.as_str(),
                holiday.note,
            ])?;
        }
        Ok(())
    }

    fn write_weekly_holidays(tx: &Transaction<'_>, days: &WeekdaySet) -> Result<(), DbError> {
        tx.execute("DELETE FROM weekly_holidays", [])?;
        let mut stmt = tx.prepare("INSERT INTO weekly_holidays (weekday) VALUES (?)")?;
        for day in days.iter() {
            stmt.execute([day])?;
        }
        Self::write_setting(tx, WEEKLY_HOLIDAYS_SET_KEY, &true)?;
        Ok(())
    }

    /// Overwrites the stored punch log.
    pub fn replace_events(&mut self, events: &[PunchEvent]) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_events(&tx, events)?;
        tx.commit()?;
        tracing::debug!(count = events.len(), "replaced punch log");
        Ok(())
    }

    /// Overwrites the stored leave records.
    pub fn replace_leaves(&mut self, leaves: &[LeaveRecord]) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_leaves(&tx, leaves)?;
        tx.commit()?;
        tracing::debug!(count = leaves.len(), "replaced leave records");
        Ok(())
    }

    /// Overwrites the stored holiday records.
    pub fn replace_holidays(&mut self, holidays: &[HolidayRecord]) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_holidays(&tx, holidays)?;
        tx.commit()?;
        tracing::debug!(count = holidays.len(), "replaced holiday records");
        Ok(())
    }

    /// Overwrites the stored weekly-off set.
    pub fn replace_weekly_holidays(&mut self, days: &WeekdaySet) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_weekly_holidays(&tx, days)?;
        tx.commit()?;
        Ok(())
    }

    /// Overwrites the stored goals.
    pub fn replace_goals(&mut self, goals: &Goals) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_setting(&tx, GOALS_KEY, goals)?;
        tx.commit()?;
        Ok(())
    }

    /// Overwrites the stored leave limits.
    pub fn replace_leave_limits(&mut self, limits: &LeaveLimits) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_setting(&tx, LEAVE_LIMITS_KEY, limits)?;
        tx.commit()?;
        Ok(())
    }

    /// Replaces all six collections in one transaction.
    ///
    /// An interrupted import rolls back completely instead of leaving mixed
    /// old/new state.
    pub fn replace_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        Self::write_events(&tx, &snapshot.events)?;
        Self::write_leaves(&tx, &snapshot.leaves)?;
        Self::write_holidays(&tx, &snapshot.holidays)?;
        Self::write_weekly_holidays(&tx, &snapshot.weekly_holidays)?;
        Self::write_setting(&tx, GOALS_KEY, &snapshot.goals)?;
        Self::write_setting(&tx, LEAVE_LIMITS_KEY, &snapshot.leave_limits)?;
        tx.commit()?;
        tracing::info!(
            events = snapshot.events.len(),
            leaves = snapshot.leaves.len(),
            holidays = snapshot.holidays.len(),
            "replaced full stored state"
        );
        Ok(())
    }
}

impl Store for Database {
    type Error = DbError;

    fn load(&self) -> Result<Snapshot, Self::Error> {
        self.load_snapshot()
    }

    fn replace_events(&mut self, events: &[PunchEvent]) -> Result<(), Self::Error> {
        Self::replace_events(self, events)
    }

    fn replace_leaves(&mut self, leaves: &[LeaveRecord]) -> Result<(), Self::Error> {
        Self::replace_leaves(self, leaves)
    }

    fn replace_holidays(&mut self, holidays: &[HolidayRecord]) -> Result<(), Self::Error> {
        Self::replace_holidays(self, holidays)
    }

    fn replace_weekly_holidays(&mut self, days: &WeekdaySet) -> Result<(), Self::Error> {
        Self::replace_weekly_holidays(self, days)
    }

    fn replace_goals(&mut self, goals: &Goals) -> Result<(), Self::Error> {
        Self::replace_goals(self, goals)
    }

    fn replace_leave_limits(&mut self, limits: &LeaveLimits) -> Result<(), Self::Error> {
        Self::replace_leave_limits(self, limits)
    }

    fn replace_all(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.replace_snapshot(snapshot)
    }
}
