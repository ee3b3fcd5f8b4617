// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::models::Project;

fn map_project(r: &Row) -> Result<Project> {
    Ok(Project {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        created_at_ms: r.get(3)?,
        display_order: r.get(4)?,
    })
}

const COLS: &str = "id, name, description, created_at_ms, display_order";

/// Shift every project down one slot and insert the new row at order 0, as a
/// single SQL transaction. A reader never sees the shift without the insert
/// or two rows sharing order 0.
///
/// An id of 0 means "assign one"; a positive id is inserted verbatim (the
/// restore path reclaims the original identity this way).
pub fn insert_at_top(conn: &mut Connection, project: &Project) -> Result<i64> {
    let tx = conn.transaction()?;
    tx.execute("UPDATE projects SET display_order = display_order + 1", [])?;
    if project.id > 0 {
        tx.execute(
            "INSERT INTO projects(id, name, description, created_at_ms, display_order)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![
                project.id,
                project.name,
                project.description,
                project.created_at_ms
            ],
        )?;
    } else {
        tx.execute(
            "INSERT INTO projects(name, description, created_at_ms, display_order)
             VALUES (?1, ?2, ?3, 0)",
            params![project.name, project.description, project.created_at_ms],
        )?;
    }
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Full-row replace; affects zero rows when the id is absent.
pub fn update(conn: &Connection, project: &Project) -> Result<usize> {
    conn.execute(
        "UPDATE projects SET name=?2, description=?3, created_at_ms=?4, display_order=?5
         WHERE id=?1",
        params![
            project.id,
            project.name,
            project.description,
            project.created_at_ms,
            project.display_order
        ],
    )
}

pub fn delete(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM projects WHERE id=?1", params![id])
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM projects WHERE id=?1"),
        params![id],
        map_project,
    )
    .optional()
}

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM projects WHERE name=?1 LIMIT 1"),
        params![name],
        map_project,
    )
    .optional()
}

pub fn find_by_name_excluding(
    conn: &Connection,
    name: &str,
    exclude_id: i64,
) -> Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM projects WHERE name=?1 AND id != ?2 LIMIT 1"),
        params![name, exclude_id],
        map_project,
    )
    .optional()
}

pub fn update_display_order(conn: &Connection, id: i64, order: i64) -> Result<usize> {
    conn.execute(
        "UPDATE projects SET display_order=?2 WHERE id=?1",
        params![id, order],
    )
}

pub fn update_many(conn: &mut Connection, projects: &[Project]) -> Result<()> {
    let tx = conn.transaction()?;
    for p in projects {
        tx.execute(
            "UPDATE projects SET name=?2, description=?3, created_at_ms=?4, display_order=?5
             WHERE id=?1",
            params![p.id, p.name, p.description, p.created_at_ms, p.display_order],
        )?;
    }
    tx.commit()
}

pub fn list_all(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM projects ORDER BY display_order ASC, created_at_ms DESC"
    ))?;
    let rows = stmt.query_map([], map_project)?;
    rows.collect()
}
