// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tallybook::db::Database;
use tallybook::{cli, commands};
use tempfile::tempdir;

fn setup() -> Arc<Database> {
    Arc::new(Database::open_in_memory().unwrap())
}

fn run(db: &Arc<Database>, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("project", sub)) => commands::projects::handle(db, sub),
        Some(("tx", sub)) => commands::transactions::handle(db, sub),
        Some(("category", sub)) => commands::categories::handle(db, sub),
        Some(("trash", sub)) => commands::trash::handle(db, sub),
        Some(("export", sub)) => commands::exporter::handle(db, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn project_add_then_income_then_export() {
    let db = setup();
    run(&db, &["tallybook", "project", "add", "Deck", "-d", "back garden"]).unwrap();
    run(
        &db,
        &[
            "tallybook",
            "tx",
            "add-income",
            "Deck",
            "125.50",
            "Advance",
            "--date",
            "2024-06-01 09:30",
            "--category",
            "Labour",
        ],
    )
    .unwrap();
    run(
        &db,
        &[
            "tallybook",
            "tx",
            "add-expense",
            "Deck",
            "25.50",
            "Screws",
            "--date",
            "2024-06-02",
        ],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("deck.csv");
    let out_str = out.to_string_lossy().to_string();
    run(
        &db,
        &["tallybook", "export", "project", "Deck", "--out", &out_str],
    )
    .unwrap();

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Time,Title,Category,Credit,Debit,Running Balance"
    );
    assert_eq!(lines[1], "2024-06-01,09:30,Advance,Labour,125.50,0.00,125.50");
    assert_eq!(lines[2], "2024-06-02,00:00,Screws,,0.00,25.50,100.00");
}

#[test]
fn invalid_amount_blocks_the_save() {
    let db = setup();
    run(&db, &["tallybook", "project", "add", "Deck"]).unwrap();
    let err = run(
        &db,
        &["tallybook", "tx", "add-income", "Deck", "12.x", "Oops"],
    );
    assert!(err.is_err());

    // Nothing was persisted.
    let conn = db.conn();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn duplicate_project_message_reaches_the_caller() {
    let db = setup();
    run(&db, &["tallybook", "project", "add", "Deck"]).unwrap();
    let err = run(&db, &["tallybook", "project", "add", "Deck"]).unwrap_err();
    assert_eq!(err.to_string(), "a project with that name already exists");
}

#[test]
fn rm_then_restore_round_trip() {
    let db = setup();
    run(&db, &["tallybook", "project", "add", "Deck"]).unwrap();
    run(&db, &["tallybook", "project", "rm", "Deck"]).unwrap();

    let id: i64 = {
        let conn = db.conn();
        conn.query_row(
            "SELECT original_id FROM deleted_projects WHERE name='Deck'",
            [],
            |r| r.get(0),
        )
        .unwrap()
    };
    run(&db, &["tallybook", "trash", "restore", &id.to_string()]).unwrap();

    let conn = db.conn();
    let live: i64 = conn
        .query_row("SELECT COUNT(*) FROM projects WHERE name='Deck'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(live, 1);
    let trashed: i64 = conn
        .query_row("SELECT COUNT(*) FROM deleted_projects", [], |r| r.get(0))
        .unwrap();
    assert_eq!(trashed, 0);
}

#[test]
fn tx_edit_keeps_the_entry_side() {
    let db = setup();
    run(&db, &["tallybook", "project", "add", "Deck"]).unwrap();
    run(
        &db,
        &["tallybook", "tx", "add-expense", "Deck", "10", "Sandpaper"],
    )
    .unwrap();

    let id: i64 = {
        let conn = db.conn();
        conn.query_row("SELECT id FROM transactions", [], |r| r.get(0))
            .unwrap()
    };
    run(
        &db,
        &[
            "tallybook",
            "tx",
            "edit",
            &id.to_string(),
            "--amount",
            "12.34",
        ],
    )
    .unwrap();

    let conn = db.conn();
    let (credit, debit): (i64, i64) = conn
        .query_row(
            "SELECT credit_minor, debit_minor FROM transactions WHERE id=?1",
            rusqlite::params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(credit, 0);
    assert_eq!(debit, 1234);
}

#[test]
fn category_rm_unknown_name_fails() {
    let db = setup();
    let err = run(&db, &["tallybook", "category", "rm", "Nope"]);
    assert!(err.is_err());
}
