// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tallybook::db::Database;
use tallybook::export;
use tallybook::repo::transaction::NewEntry;
use tallybook::repo::{ProjectRepository, TransactionRepository};

fn setup() -> (Arc<Database>, ProjectRepository, TransactionRepository) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let projects = ProjectRepository::new(Arc::clone(&db));
    let txns = TransactionRepository::new(Arc::clone(&db));
    (db, projects, txns)
}

fn at(ms: i64) -> NewEntry {
    NewEntry {
        timestamp_ms: Some(ms),
        ..NewEntry::default()
    }
}

fn single_csv(db: &Arc<Database>, project: &tallybook::models::Project) -> String {
    let mut out = Vec::new();
    {
        let conn = db.conn();
        export::write_single_project(&conn, project, &mut out).unwrap();
    }
    String::from_utf8(out).unwrap()
}

#[test]
fn running_balance_accumulates_in_timestamp_order() {
    let (db, projects, txns) = setup();
    let p = projects.create_project("Site", None).unwrap();
    // Inserted out of order; the export sorts by timestamp.
    txns.add_expense(p.id, 200, "Nails", at(2)).unwrap();
    txns.add_income(p.id, 500, "Advance", at(1)).unwrap();

    let csv = single_csv(&db, &p);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Time,Title,Category,Credit,Debit,Running Balance"
    );
    assert!(lines[1].ends_with("Advance,,5.00,0.00,5.00"));
    assert!(lines[2].ends_with("Nails,,0.00,2.00,3.00"));
}

#[test]
fn titles_with_commas_and_quotes_are_quoted() {
    let (db, projects, txns) = setup();
    let p = projects.create_project("Odd titles", None).unwrap();
    txns.add_income(p.id, 100, r#"Paint, "matte""#, at(1)).unwrap();

    let csv = single_csv(&db, &p);
    assert!(csv.contains(r#""Paint, ""matte""""#));
}

#[test]
fn dates_and_times_render_utc() {
    let (db, projects, txns) = setup();
    let p = projects.create_project("Clock", None).unwrap();
    // 2024-03-01 13:45:00 UTC
    txns.add_income(p.id, 100, "Tick", at(1_709_300_700_000)).unwrap();

    let csv = single_csv(&db, &p);
    assert!(csv.contains("2024-03-01,13:45,Tick"));
}

#[test]
fn empty_project_exports_header_only() {
    let (db, projects, _txns) = setup();
    let p = projects.create_project("Nothing yet", None).unwrap();
    let csv = single_csv(&db, &p);
    assert_eq!(
        csv,
        "Date,Time,Title,Category,Credit,Debit,Running Balance\n"
    );
}

#[test]
fn all_projects_export_resets_running_balance_per_group() {
    let (db, projects, txns) = setup();
    let a = projects.create_project("A", None).unwrap();
    let b = tallybook::models::Project {
        created_at_ms: a.created_at_ms + 10_000,
        ..projects.create_project("B", None).unwrap()
    };
    projects.update_project(&b).unwrap();
    txns.add_income(a.id, 500, "a1", at(1)).unwrap();
    txns.add_expense(a.id, 200, "a2", at(2)).unwrap();
    txns.add_income(b.id, 100, "b1", at(3)).unwrap();

    let mut out = Vec::new();
    {
        let conn = db.conn();
        export::write_all_projects(&conn, &mut out).unwrap();
    }
    let csv = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Project Name,Date,Time,Title,Category,Credit,Debit,Running Balance"
    );
    // Balance-query order: most recently created project first.
    assert!(lines[1].starts_with("B,"));
    assert!(lines[1].ends_with("b1,,1.00,0.00,1.00"));
    assert!(lines[2].starts_with("A,"));
    assert!(lines[2].ends_with("a1,,5.00,0.00,5.00"));
    assert!(lines[3].starts_with("A,"));
    assert!(lines[3].ends_with("a2,,0.00,2.00,3.00"));
}

#[test]
fn category_names_appear_in_the_category_column() {
    let (db, projects, txns) = setup();
    let categories = tallybook::repo::CategoryRepository::new(Arc::clone(&db));
    let p = projects.create_project("Cats", None).unwrap();
    let c = categories.add_category("Materials").unwrap();
    txns.add_expense(
        p.id,
        300,
        "Plywood",
        NewEntry {
            timestamp_ms: Some(1),
            category_id: Some(c.id),
            ..NewEntry::default()
        },
    )
    .unwrap();

    let csv = single_csv(&db, &p);
    assert!(csv.contains("Plywood,Materials,0.00,3.00,-3.00"));
}
