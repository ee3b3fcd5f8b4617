// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::db::Database;
use crate::repo::{DeletedProjectRepository, ProjectRepository};
use crate::utils::{fmt_datetime, maybe_print_json, pretty_table};

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    let repo = DeletedProjectRepository::new(Arc::clone(db));
    match m.subcommand() {
        Some(("list", sub)) => {
            // Entering the trash listing doubles as the retention sweep,
            // like the original screen did on entry.
            repo.cleanup_old_deleted_projects()?;

            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let deleted = repo.list_deleted()?;
            if !maybe_print_json(json_flag, jsonl_flag, &deleted)? {
                let rows: Vec<Vec<String>> = deleted
                    .iter()
                    .map(|d| {
                        vec![
                            d.original_id.to_string(),
                            d.name.clone(),
                            d.description.clone().unwrap_or_default(),
                            fmt_datetime(d.deleted_at_ms),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Original ID", "Name", "Description", "Deleted"], rows)
                );
            }
        }
        Some(("restore", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let Some(deleted) = repo.get_by_original_id(id)? else {
                bail!("Nothing in the trash for original id {}", id);
            };
            let restored = repo.restore_from_trash(&deleted)?;
            let projects = ProjectRepository::new(Arc::clone(db));
            projects.insert_restored(&restored)?;
            println!(
                "Restored project '{}' (id {}); its transactions were not recoverable",
                restored.name, restored.id
            );
        }
        Some(("purge", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let Some(deleted) = repo.get_by_original_id(id)? else {
                bail!("Nothing in the trash for original id {}", id);
            };
            repo.permanently_delete(&deleted)?;
            println!("Permanently deleted '{}'", deleted.name);
        }
        Some(("cleanup", _)) => {
            let n = repo.cleanup_old_deleted_projects()?;
            println!("Purged {} expired trash record(s)", n);
        }
        _ => {}
    }
    Ok(())
}
