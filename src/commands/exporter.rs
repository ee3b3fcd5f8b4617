// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::db::Database;
use crate::export;
use crate::repo::ProjectRepository;

pub fn handle(db: &Arc<Database>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("project", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let out = sub.get_one::<String>("out").unwrap();
            let repo = ProjectRepository::new(Arc::clone(db));
            let Some(project) = repo.get_project_by_name(name)? else {
                bail!("Project '{}' not found", name);
            };
            let file = File::create(out)?;
            {
                let conn = db.conn();
                export::write_single_project(&conn, &project, file)?;
            }
            println!("Exported '{}' to {}", project.name, out);
        }
        Some(("all", sub)) => {
            let out = sub.get_one::<String>("out").unwrap();
            let file = File::create(out)?;
            {
                let conn = db.conn();
                export::write_all_projects(&conn, file)?;
            }
            println!("Exported all projects to {}", out);
        }
        _ => {}
    }
    Ok(())
}
