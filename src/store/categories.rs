// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::models::Category;

/// Categories are created on demand: inserting an existing name is a no-op
/// and the established id is returned.
pub fn get_or_create(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    conn.query_row(
        "SELECT id FROM categories WHERE name=?1",
        params![name],
        |r| r.get(0),
    )
}

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name FROM categories WHERE name=?1",
        params![name],
        |r| {
            Ok(Category {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()
}

/// Referencing transactions keep their rows; the category foreign key is
/// nulled out by the schema's ON DELETE SET NULL.
pub fn delete_by_id(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])
}

pub fn list_all(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name ASC")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    rows.collect()
}
