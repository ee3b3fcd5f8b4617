// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::observe::ChangeBus;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let dir = proj.data_dir().to_path_buf();
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir)
}

pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("tallybook.sqlite"))
}

/// The process-wide database resource: one connection behind a mutex plus the
/// change bus that live queries subscribe to. Constructed once by the
/// composition root and shared as `Arc<Database>`; dropping it at shutdown
/// closes the underlying handle.
pub struct Database {
    conn: Mutex<Connection>,
    changes: ChangeBus,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let mut conn = Connection::open(path)
            .with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            changes: ChangeBus::new(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().context("Open in-memory DB")?;
        init_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            changes: ChangeBus::new(),
        })
    }

    /// Writers hold this guard for the duration of one logical operation;
    /// multi-step operations open a SQL transaction on it. Change events are
    /// published only after the guard is released.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    pub fn changes(&self) -> &ChangeBus {
        &self.changes
    }
}

pub fn open_or_init() -> Result<Database> {
    let path = db_path()?;
    Database::open(&path)
}

pub fn open_at(path: &Path) -> Result<Database> {
    Database::open(path)
}

// Schema versions: 1 predates display_order, 2 is current. A fresh file
// (user_version 0) gets the full schema directly at version 2.
const SCHEMA_VERSION: i64 = 2;

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if version == 0 {
        conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS projects(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at_ms INTEGER NOT NULL,
            display_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS categories(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL,
            timestamp_ms INTEGER NOT NULL,
            title TEXT NOT NULL,
            notes TEXT,
            category_id INTEGER,
            credit_minor INTEGER NOT NULL DEFAULT 0 CHECK(credit_minor >= 0),
            debit_minor INTEGER NOT NULL DEFAULT 0 CHECK(debit_minor >= 0),
            FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS idx_transactions_project ON transactions(project_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_timestamp ON transactions(timestamp_ms);

        CREATE TABLE IF NOT EXISTS deleted_projects(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            original_id INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            created_at_ms INTEGER NOT NULL,
            deleted_at_ms INTEGER NOT NULL
        );
        "#,
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    } else if version == 1 {
        conn.execute_batch(
            "ALTER TABLE projects ADD COLUMN display_order INTEGER NOT NULL DEFAULT 0;",
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}
