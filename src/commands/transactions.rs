// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::db::Database;
use crate::repo::{CategoryRepository, TransactionRepository};
use crate::repo::transaction::NewEntry;
use crate::utils::{
    fmt_datetime, format_minor, id_for_project, maybe_print_json, parse_amount_minor,
    parse_timestamp_ms, pretty_table,
};

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-income", sub)) => add(db, sub, true)?,
        Some(("add-expense", sub)) => add(db, sub, false)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(db: &Arc<Database>, sub: &clap::ArgMatches, income: bool) -> Result<()> {
    let project_name = sub.get_one::<String>("project").unwrap();
    let amount_str = sub.get_one::<String>("amount").unwrap();
    let title = sub.get_one::<String>("title").unwrap();

    // An unparseable amount blocks the save; it is never coerced to zero.
    let Some(amount_minor) = parse_amount_minor(amount_str) else {
        bail!("Invalid amount '{}'", amount_str);
    };

    let project_id = {
        let conn = db.conn();
        id_for_project(&conn, project_name)?
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => {
            let categories = CategoryRepository::new(Arc::clone(db));
            Some(categories.add_category(name)?.id)
        }
        None => None,
    };
    let timestamp_ms = sub
        .get_one::<String>("date")
        .map(|s| parse_timestamp_ms(s))
        .transpose()?;

    let entry = NewEntry {
        timestamp_ms,
        category_id,
        notes: sub.get_one::<String>("notes").cloned(),
    };
    let repo = TransactionRepository::new(Arc::clone(db));
    let id = if income {
        repo.add_income(project_id, amount_minor, title, entry)?
    } else {
        repo.add_expense(project_id, amount_minor, title, entry)?
    };
    println!(
        "Recorded {} of {} in '{}' (id {})",
        if income { "income" } else { "expense" },
        format_minor(amount_minor),
        project_name,
        id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub category: String,
    pub credit: String,
    pub debit: String,
    pub notes: String,
}

fn list(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(db, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.title.clone(),
                    r.category.clone(),
                    r.credit.clone(),
                    r.debit.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Title", "Category", "Credit", "Debit", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let project_name = sub.get_one::<String>("project").unwrap();
    let project_id = {
        let conn = db.conn();
        id_for_project(&conn, project_name)?
    };
    let repo = TransactionRepository::new(Arc::clone(db));
    let mut txns = repo.list_for_project(project_id)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txns.truncate(*limit);
    }

    let categories = CategoryRepository::new(Arc::clone(db));
    let names: HashMap<i64, String> = categories
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(txns
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: fmt_datetime(t.timestamp_ms),
            title: t.title,
            category: t
                .category_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_default(),
            credit: format_minor(t.credit_minor),
            debit: format_minor(t.debit_minor),
            notes: t.notes.unwrap_or_default(),
        })
        .collect())
}

fn edit(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let repo = TransactionRepository::new(Arc::clone(db));
    let Some(mut t) = repo.get_by_id(id)? else {
        bail!("No transaction with id {}", id);
    };
    if let Some(amount_str) = sub.get_one::<String>("amount") {
        let Some(amount_minor) = parse_amount_minor(amount_str) else {
            bail!("Invalid amount '{}'", amount_str);
        };
        // The entry keeps its income/expense side; only the magnitude moves.
        if t.credit_minor > 0 {
            t.credit_minor = amount_minor;
        } else {
            t.debit_minor = amount_minor;
        }
    }
    if let Some(title) = sub.get_one::<String>("title") {
        t.title = title.clone();
    }
    if let Some(notes) = sub.get_one::<String>("notes") {
        t.notes = if notes.is_empty() {
            None
        } else {
            Some(notes.clone())
        };
    }
    repo.update(&t)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let repo = TransactionRepository::new(Arc::clone(db));
    repo.delete(id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
