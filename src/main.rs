// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use tallybook::{cli, commands, db, logging};

fn main() -> Result<()> {
    logging::init()?;

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    // Composition root: the one Database handle for the process, shared
    // with every repository and closed when it drops at exit.
    let db = Arc::new(match matches.get_one::<String>("db") {
        Some(path) => db::open_at(Path::new(path))?,
        None => db::open_or_init()?,
    });

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match matches.get_one::<String>("db") {
                Some(p) => PathBuf::from(p),
                None => db::db_path()?,
            };
            println!("Database initialized at {}", path.display());
        }
        Some(("project", sub)) => commands::projects::handle(&db, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&db, sub)?,
        Some(("category", sub)) => commands::categories::handle(&db, sub)?,
        Some(("trash", sub)) => commands::trash::handle(&db, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&db, sub)?,
        Some(("watch", sub)) => commands::watch::handle(&db, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
