// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage handle: owns the SQLite connection and the schema.

use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.example", "PocketMoney", "pocketmoney"));

pub const DB_FILE: &str = "pocket_money.db";

/// Platform data directory location of the database, created on demand.
pub fn default_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join(DB_FILE))
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS Wallets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        balance INTEGER NOT NULL DEFAULT 0
    );

    -- type: 0 = INCOME, 1 = EXPENSE; amount is a magnitude in minor units
    CREATE TABLE IF NOT EXISTS Transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        wallet_id INTEGER NOT NULL,
        description TEXT,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        type INTEGER NOT NULL CHECK(type IN (0, 1)),
        timestamp TEXT NOT NULL,
        FOREIGN KEY(wallet_id) REFERENCES Wallets(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_wallet ON Transactions(wallet_id, timestamp);
"#;

/// A database file plus, while open, its connection. Dropping the handle
/// closes the connection.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Opens the database and ensures the schema exists.
    pub fn open_and_init(path: impl Into<PathBuf>) -> Result<Self> {
        let mut storage = Storage::new(path);
        storage.open()?;
        storage.create_tables()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        Storage::open_and_init(":memory:")
    }

    pub fn open(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), "database opened");
        self.conn = Some(conn);
        Ok(())
    }

    pub fn create_tables(&self) -> Result<()> {
        self.conn()?
            .execute_batch(SCHEMA)
            .map_err(StoreError::Schema)?;
        debug!("Wallets and Transactions tables ready");
        Ok(())
    }

    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!(path = %self.path.display(), "database closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotOpen)
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_storage_fails_closed() {
        let storage = Storage::new(":memory:");
        assert!(!storage.is_open());
        assert!(matches!(storage.conn(), Err(StoreError::NotOpen)));
        assert!(matches!(storage.create_tables(), Err(StoreError::NotOpen)));
    }

    #[test]
    fn open_is_idempotent_and_schema_is_rerunnable() {
        let mut storage = Storage::in_memory().unwrap();
        storage.open().unwrap();
        storage.create_tables().unwrap();
        let n: i64 = storage
            .conn()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('Wallets','Transactions')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 2);
        storage.close();
        storage.close();
        assert!(!storage.is_open());
    }
}
