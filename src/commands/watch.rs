// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;

use crate::db::Database;
use crate::observe::Subscription;
use crate::repo::{DeletedProjectRepository, ProjectRepository};
use crate::utils::{fmt_datetime, format_minor, pretty_table};

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => {
            let repo = ProjectRepository::new(Arc::clone(db));
            let subscription = repo.observe_balances()?;
            watch_loop(sub, subscription, |balances| {
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
            });
        }
        Some(("projects", sub)) => {
            let repo = ProjectRepository::new(Arc::clone(db));
            let subscription = repo.observe_projects()?;
            watch_loop(sub, subscription, |projects| {
                let rows: Vec<Vec<String>> = projects
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.name.clone(),
                            p.display_order.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Order"], rows));
            });
        }
        Some(("trash", sub)) => {
            let repo = DeletedProjectRepository::new(Arc::clone(db));
            let subscription = repo.observe_deleted_projects()?;
            watch_loop(sub, subscription, |deleted| {
                let rows: Vec<Vec<String>> = deleted
                    .iter()
                    .map(|d| {
                        vec![
                            d.original_id.to_string(),
                            d.name.clone(),
                            fmt_datetime(d.deleted_at_ms),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Original ID", "Name", "Deleted"], rows)
                );
            });
        }
        _ => {}
    }
    Ok(())
}

/// Print every snapshot as it arrives; `--count` bounds how many before
/// returning (otherwise runs until interrupted).
fn watch_loop<T, F: Fn(&T)>(sub: &clap::ArgMatches, subscription: Subscription<T>, render: F) {
    let mut remaining = sub.get_one::<usize>("count").copied();
    if remaining == Some(0) {
        return;
    }
    while let Some(snapshot) = subscription.recv() {
        render(&snapshot);
        if let Some(n) = remaining.as_mut() {
            *n -= 1;
            if *n == 0 {
                break;
            }
        }
    }
}
