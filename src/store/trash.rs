// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::models::DeletedProject;

fn map_deleted(r: &Row) -> Result<DeletedProject> {
    Ok(DeletedProject {
        id: r.get(0)?,
        original_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        created_at_ms: r.get(4)?,
        deleted_at_ms: r.get(5)?,
    })
}

const COLS: &str = "id, original_id, name, description, created_at_ms, deleted_at_ms";

/// The unique index on original_id keeps a project from sitting in the trash
/// twice.
pub fn insert(conn: &Connection, d: &DeletedProject) -> Result<i64> {
    conn.execute(
        "INSERT INTO deleted_projects(original_id, name, description, created_at_ms, deleted_at_ms)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            d.original_id,
            d.name,
            d.description,
            d.created_at_ms,
            d.deleted_at_ms
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_by_original_id(conn: &Connection, original_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM deleted_projects WHERE original_id=?1",
        params![original_id],
    )
}

pub fn get_by_original_id(conn: &Connection, original_id: i64) -> Result<Option<DeletedProject>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM deleted_projects WHERE original_id=?1"),
        params![original_id],
        map_deleted,
    )
    .optional()
}

pub fn list_all(conn: &Connection) -> Result<Vec<DeletedProject>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM deleted_projects ORDER BY deleted_at_ms DESC"
    ))?;
    let rows = stmt.query_map([], map_deleted)?;
    rows.collect()
}

/// Strict inequality: a row deleted exactly at the cutoff survives.
pub fn delete_older_than(conn: &Connection, cutoff_ms: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM deleted_projects WHERE deleted_at_ms < ?1",
        params![cutoff_ms],
    )
}
