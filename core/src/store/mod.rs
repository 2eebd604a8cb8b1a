//! SQLite persistence layer.
//!
//! RULE: Only store modules talk to the database.
//! The service calls store methods; it never executes SQL directly.
//!
//! Scenario-name uniqueness is enforced by the UNIQUE constraint on
//! `scenario.scenario_name`; there is no read-then-insert check.

use crate::error::RoiResult;
use rusqlite::Connection;
use std::time::Duration;

mod lead;
mod scenario;

pub struct ScenarioStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl ScenarioStore {
    pub fn open(path: &str) -> RoiResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // Concurrent writers wait for the lock instead of failing with SQLITE_BUSY.
        conn.busy_timeout(Duration::from_secs(5))?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RoiResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> RoiResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order. Safe to run repeatedly.
    pub fn migrate(&self) -> RoiResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_scenarios.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_leads.sql"))?;
        Ok(())
    }
}
