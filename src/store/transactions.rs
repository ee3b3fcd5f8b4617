// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::models::{ProjectBalance, Transaction};

fn map_transaction(r: &Row) -> Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        project_id: r.get(1)?,
        timestamp_ms: r.get(2)?,
        title: r.get(3)?,
        notes: r.get(4)?,
        category_id: r.get(5)?,
        credit_minor: r.get(6)?,
        debit_minor: r.get(7)?,
    })
}

const COLS: &str = "id, project_id, timestamp_ms, title, notes, category_id, credit_minor, debit_minor";

pub fn insert(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(project_id, timestamp_ms, title, notes, category_id, credit_minor, debit_minor)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            t.project_id,
            t.timestamp_ms,
            t.title,
            t.notes,
            t.category_id,
            t.credit_minor,
            t.debit_minor
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, t: &Transaction) -> Result<usize> {
    conn.execute(
        "UPDATE transactions SET project_id=?2, timestamp_ms=?3, title=?4, notes=?5,
         category_id=?6, credit_minor=?7, debit_minor=?8 WHERE id=?1",
        params![
            t.id,
            t.project_id,
            t.timestamp_ms,
            t.title,
            t.notes,
            t.category_id,
            t.credit_minor,
            t.debit_minor
        ],
    )
}

pub fn delete(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])
}

pub fn delete_by_project(conn: &Connection, project_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM transactions WHERE project_id=?1",
        params![project_id],
    )
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM transactions WHERE id=?1"),
        params![id],
        map_transaction,
    )
    .optional()
}

pub fn list_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM transactions WHERE project_id=?1 ORDER BY timestamp_ms DESC"
    ))?;
    let rows = stmt.query_map(params![project_id], map_transaction)?;
    rows.collect()
}

pub fn list_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLS} FROM transactions"))?;
    let rows = stmt.query_map([], map_transaction)?;
    rows.collect()
}

/// Transactions for one project in timestamp-ascending order, each with its
/// category name resolved. This is the export feed.
pub fn list_for_export(
    conn: &Connection,
    project_id: i64,
) -> Result<Vec<(Transaction, Option<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.project_id, t.timestamp_ms, t.title, t.notes, t.category_id,
                t.credit_minor, t.debit_minor, c.name
         FROM transactions t
         LEFT JOIN categories c ON t.category_id = c.id
         WHERE t.project_id = ?1
         ORDER BY t.timestamp_ms ASC, t.id ASC",
    )?;
    let rows = stmt.query_map(params![project_id], |r| {
        Ok((map_transaction(r)?, r.get::<_, Option<String>>(8)?))
    })?;
    rows.collect()
}

/// One row per live project, transactions or not: `IFNULL` keeps empty
/// projects at balance 0 instead of dropping them from the join.
pub fn project_balances(conn: &Connection) -> Result<Vec<ProjectBalance>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.description,
                IFNULL(SUM(t.credit_minor), 0) - IFNULL(SUM(t.debit_minor), 0) AS balance
         FROM projects p
         LEFT JOIN transactions t ON p.id = t.project_id
         GROUP BY p.id
         ORDER BY p.created_at_ms DESC, p.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ProjectBalance {
            project_id: r.get(0)?,
            name: r.get(1)?,
            description: r.get(2)?,
            balance_minor: r.get(3)?,
        })
    })?;
    rows.collect()
}
