// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io;

use anyhow::Result;
use rusqlite::Connection;

use crate::models::Project;
use crate::store;
use crate::utils::{fmt_date, fmt_time, format_minor};

const SINGLE_HEADER: [&str; 7] = [
    "Date",
    "Time",
    "Title",
    "Category",
    "Credit",
    "Debit",
    "Running Balance",
];

const ALL_HEADER: [&str; 8] = [
    "Project Name",
    "Date",
    "Time",
    "Title",
    "Category",
    "Credit",
    "Debit",
    "Running Balance",
];

/// One project's transactions in timestamp-ascending order with a
/// cumulative credit-minus-debit column. The single-project format carries
/// no project name column; the two layouts are independent (see the
/// all-projects variant below).
pub fn write_single_project<W: io::Write>(
    conn: &Connection,
    project: &Project,
    out: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(SINGLE_HEADER)?;
    let mut running = 0i64;
    for (t, category) in store::transactions::list_for_export(conn, project.id)? {
        running += t.credit_minor - t.debit_minor;
        wtr.write_record([
            fmt_date(t.timestamp_ms),
            fmt_time(t.timestamp_ms),
            t.title,
            category.unwrap_or_default(),
            format_minor(t.credit_minor),
            format_minor(t.debit_minor),
            format_minor(running),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Every live project, grouped in balance-query order (most recently
/// created first), transactions ascending within the group, and the running
/// balance reset to zero at the start of each group.
pub fn write_all_projects<W: io::Write>(conn: &Connection, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(ALL_HEADER)?;
    for balance in store::transactions::project_balances(conn)? {
        let mut running = 0i64;
        for (t, category) in store::transactions::list_for_export(conn, balance.project_id)? {
            running += t.credit_minor - t.debit_minor;
            wtr.write_record([
                balance.name.clone(),
                fmt_date(t.timestamp_ms),
                fmt_time(t.timestamp_ms),
                t.title,
                category.unwrap_or_default(),
                format_minor(t.credit_minor),
                format_minor(t.debit_minor),
                format_minor(running),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
