// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::db::Database;
use crate::repo::CategoryRepository;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    let repo = CategoryRepository::new(Arc::clone(db));
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let category = repo.add_category(name)?;
            println!("Added category '{}' (id {})", category.name, category.id);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let categories = repo.list_categories()?;
            if !maybe_print_json(json_flag, jsonl_flag, &categories)? {
                let rows: Vec<Vec<String>> = categories
                    .iter()
                    .map(|c| vec![c.id.to_string(), c.name.clone()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let Some(category) = repo.get_by_name(name)? else {
                bail!("Category '{}' not found", name);
            };
            repo.delete_category(category.id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
