// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::db::Database;
use crate::repo::{DeletedProjectRepository, ProjectRepository};
use crate::utils::{fmt_datetime, format_minor, maybe_print_json, pretty_table};

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("balances", sub)) => balances(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("reorder", sub)) => reorder(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let description = sub.get_one::<String>("description").map(|s| s.as_str());
    let repo = ProjectRepository::new(Arc::clone(db));
    let project = repo.create_project(name, description)?;
    println!("Created project '{}' (id {})", project.name, project.id);
    Ok(())
}

fn list(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let repo = ProjectRepository::new(Arc::clone(db));
    let projects = repo.list_projects()?;
    if !maybe_print_json(json_flag, jsonl_flag, &projects)? {
        let rows: Vec<Vec<String>> = projects
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.description.clone().unwrap_or_default(),
                    fmt_datetime(p.created_at_ms),
                    p.display_order.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Description", "Created", "Order"], rows)
        );
    }
    Ok(())
}

fn balances(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let repo = ProjectRepository::new(Arc::clone(db));
    let balances = repo.project_balances()?;
    if !maybe_print_json(json_flag, jsonl_flag, &balances)? {
        let rows: Vec<Vec<String>> = balances
            .iter()
            .map(|b| {
                vec![
                    b.project_id.to_string(),
                    b.name.clone(),
                    format_minor(b.balance_minor),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Balance"], rows));
    }
    Ok(())
}

fn edit(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let repo = ProjectRepository::new(Arc::clone(db));
    let Some(mut project) = repo.get_project_by_id(id)? else {
        bail!("No project with id {}", id);
    };
    if let Some(name) = sub.get_one::<String>("name") {
        project.name = name.trim().to_string();
    }
    if let Some(description) = sub.get_one::<String>("description") {
        let trimmed = description.trim();
        project.description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
    repo.update_project(&project)?;
    println!("Updated project '{}' (id {})", project.name, project.id);
    Ok(())
}

fn reorder(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let order = *sub.get_one::<i64>("order").unwrap();
    let repo = ProjectRepository::new(Arc::clone(db));
    repo.update_project_order(id, order)?;
    println!("Project {} moved to order {}", id, order);
    Ok(())
}

fn rm(db: &Arc<Database>, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let projects = ProjectRepository::new(Arc::clone(db));
    let Some(project) = projects.get_project_by_name(name)? else {
        bail!("Project '{}' not found", name);
    };
    let trash = DeletedProjectRepository::new(Arc::clone(db));
    trash.move_to_trash(&project)?;
    println!(
        "Moved '{}' to trash; restore with `tallybook trash restore {}`",
        project.name, project.id
    );
    Ok(())
}
