// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn entry_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("project").required(true).help("Project name"))
        .arg(Arg::new("amount").required(true).help("Amount, e.g. 12.50"))
        .arg(Arg::new("title").required(true).help("Entry title"))
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD [HH:MM]")
                .help("Timestamp (defaults to now, UTC)"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .short('c')
                .help("Category name, created on demand"),
        )
        .arg(Arg::new("notes").long("notes").short('n').help("Free-form notes"))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .version(clap::crate_version!())
        .about("Project ledgers: income/expense tracking, live balances, trash recovery, CSV export")
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .global(true)
                .help("Override the database file path"),
        )
        .subcommand(Command::new("init").about("Initialize the database and print its location"))
        .subcommand(
            Command::new("project")
                .about("Manage projects")
                .subcommand(
                    Command::new("add")
                        .about("Create a project at the top of the list")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("description").long("description").short('d')),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List projects in display order"),
                ))
                .subcommand(json_flags(
                    Command::new("balances")
                        .about("Per-project balances, most recently created first"),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Rename or re-describe a project")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("description").long("description").short('d')),
                )
                .subcommand(
                    Command::new("reorder")
                        .about("Set a project's display order (lower is higher)")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("order")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Move a project and its transactions to the trash")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(entry_args(
                    Command::new("add-income").about("Record an income entry"),
                ))
                .subcommand(entry_args(
                    Command::new("add-expense").about("Record an expense entry"),
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List a project's transactions, newest first")
                        .arg(Arg::new("project").required(true))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit an entry in place, keeping its income/expense side")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("notes").long("notes").short('n')),
                )
                .subcommand(
                    Command::new("rm").about("Delete an entry").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List categories")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category (references are cleared, not deleted)")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("trash")
                .about("Recoverable project deletion")
                .subcommand(json_flags(
                    Command::new("list").about("List trashed projects, newest first"),
                ))
                .subcommand(
                    Command::new("restore")
                        .about("Restore a trashed project (transactions are not recovered)")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Original project id"),
                        ),
                )
                .subcommand(
                    Command::new("purge")
                        .about("Permanently delete a trashed project")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Original project id"),
                        ),
                )
                .subcommand(
                    Command::new("cleanup")
                        .about("Purge trash records older than 30 days"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions to CSV")
                .subcommand(
                    Command::new("project")
                        .about("Export one project")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("all")
                        .about("Export every project")
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Subscribe to a live query and re-print it on every change")
                .subcommand(
                    Command::new("balances")
                        .about("Watch per-project balances")
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .value_parser(value_parser!(usize))
                                .help("Exit after this many snapshots"),
                        ),
                )
                .subcommand(
                    Command::new("projects").about("Watch the project list").arg(
                        Arg::new("count")
                            .long("count")
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(
                    Command::new("trash").about("Watch the trash listing").arg(
                        Arg::new("count")
                            .long("count")
                            .value_parser(value_parser!(usize)),
                    ),
                ),
        )
}
