// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use tallybook::db::Database;
use tallybook::error::Error;
use tallybook::repo::transaction::NewEntry;
use tallybook::repo::{CategoryRepository, ProjectRepository, TransactionRepository};

fn setup() -> (Arc<Database>, ProjectRepository, TransactionRepository) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let projects = ProjectRepository::new(Arc::clone(&db));
    let txns = TransactionRepository::new(Arc::clone(&db));
    (db, projects, txns)
}

#[test]
fn income_populates_credit_only() {
    let (_db, projects, txns) = setup();
    let p = projects.create_project("Household", None).unwrap();
    let id = txns
        .add_income(p.id, 1250, "Refund", NewEntry::default())
        .unwrap();
    let t = txns.get_by_id(id).unwrap().unwrap();
    assert_eq!(t.credit_minor, 1250);
    assert_eq!(t.debit_minor, 0);
}

#[test]
fn expense_populates_debit_only() {
    let (_db, projects, txns) = setup();
    let p = projects.create_project("Household", None).unwrap();
    let id = txns
        .add_expense(p.id, 200, "Bus fare", NewEntry::default())
        .unwrap();
    let t = txns.get_by_id(id).unwrap().unwrap();
    assert_eq!(t.credit_minor, 0);
    assert_eq!(t.debit_minor, 200);
}

#[test]
fn zero_amount_is_rejected() {
    let (_db, projects, txns) = setup();
    let p = projects.create_project("Household", None).unwrap();
    let err = txns
        .add_income(p.id, 0, "Nothing", NewEntry::default())
        .unwrap_err();
    assert!(matches!(err, Error::NonPositiveAmount));
}

#[test]
fn unknown_project_is_rejected() {
    let (_db, _projects, txns) = setup();
    let err = txns
        .add_income(4242, 100, "Orphan", NewEntry::default())
        .unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound(4242)));
}

#[test]
fn balance_is_credit_minus_debit_per_project() {
    let (_db, projects, txns) = setup();
    let a = projects.create_project("A", None).unwrap();
    let b = projects.create_project("B", None).unwrap();
    txns.add_income(a.id, 500, "Seed", NewEntry::default()).unwrap();
    txns.add_expense(a.id, 200, "Paint", NewEntry::default()).unwrap();
    txns.add_income(b.id, 10_000, "Deposit", NewEntry::default())
        .unwrap();

    let balances = projects.project_balances().unwrap();
    let of = |id: i64| balances.iter().find(|r| r.project_id == id).unwrap();
    assert_eq!(of(a.id).balance_minor, 300);
    assert_eq!(of(b.id).balance_minor, 10_000);
}

#[test]
fn projects_without_transactions_appear_at_zero() {
    let (_db, projects, _txns) = setup();
    let p = projects.create_project("Empty", None).unwrap();
    let balances = projects.project_balances().unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].project_id, p.id);
    assert_eq!(balances[0].balance_minor, 0);
}

#[test]
fn balances_list_newest_project_first() {
    let (_db, projects, _txns) = setup();
    let older = projects.create_project("Older", None).unwrap();
    let newer = tallybook::models::Project {
        created_at_ms: older.created_at_ms + 10_000,
        ..projects.create_project("Newer", None).unwrap()
    };
    projects.update_project(&newer).unwrap();

    let balances = projects.project_balances().unwrap();
    assert_eq!(balances[0].name, "Newer");
    assert_eq!(balances[1].name, "Older");
}

#[test]
fn cascade_delete_with_project() {
    let (db, projects, txns) = setup();
    let p = projects.create_project("Doomed", None).unwrap();
    txns.add_income(p.id, 100, "x", NewEntry::default()).unwrap();
    projects.delete_project(&p).unwrap();
    {
        let conn = db.conn();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }
}

#[test]
fn category_delete_nulls_references() {
    let (db, projects, txns) = setup();
    let categories = CategoryRepository::new(Arc::clone(&db));
    let p = projects.create_project("Food", None).unwrap();
    let snacks = categories.add_category("Snacks").unwrap();
    let id = txns
        .add_income(
            p.id,
            100,
            "Crisps",
            NewEntry {
                category_id: Some(snacks.id),
                ..NewEntry::default()
            },
        )
        .unwrap();

    categories.delete_category(snacks.id).unwrap();

    let t = txns.get_by_id(id).unwrap().unwrap();
    assert_eq!(t.category_id, None);
}

#[test]
fn add_category_is_idempotent_per_name() {
    let (db, _projects, _txns) = setup();
    let categories = CategoryRepository::new(Arc::clone(&db));
    let first = categories.add_category("Fuel").unwrap();
    let second = categories.add_category("Fuel").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(categories.list_categories().unwrap().len(), 1);
}
