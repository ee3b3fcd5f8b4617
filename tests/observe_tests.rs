// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use std::time::Duration;

use tallybook::db::Database;
use tallybook::repo::transaction::NewEntry;
use tallybook::repo::{CategoryRepository, DeletedProjectRepository, ProjectRepository, TransactionRepository};

const WAIT: Duration = Duration::from_secs(5);

fn setup() -> (Arc<Database>, ProjectRepository, TransactionRepository) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let projects = ProjectRepository::new(Arc::clone(&db));
    let txns = TransactionRepository::new(Arc::clone(&db));
    (db, projects, txns)
}

#[test]
fn subscriber_receives_the_current_snapshot_immediately() {
    let (_db, projects, _txns) = setup();
    projects.create_project("Seeded", None).unwrap();

    let sub = projects.observe_projects().unwrap();
    let snapshot = sub.recv_timeout(WAIT).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "Seeded");
}

#[test]
fn writes_push_a_fresh_snapshot() {
    let (_db, projects, txns) = setup();
    let p = projects.create_project("Watched", None).unwrap();

    let sub = projects.observe_balances().unwrap();
    let initial = sub.recv_timeout(WAIT).unwrap();
    assert_eq!(initial[0].balance_minor, 0);

    txns.add_income(p.id, 500, "Advance", NewEntry::default())
        .unwrap();

    // Subsequent snapshots are full recomputations; take the latest that
    // reflects the write.
    let mut balance = None;
    while let Some(snapshot) = sub.recv_timeout(WAIT) {
        if snapshot[0].balance_minor == 500 {
            balance = Some(snapshot[0].balance_minor);
            break;
        }
    }
    assert_eq!(balance, Some(500));
}

#[test]
fn balance_query_reacts_to_both_source_tables() {
    let (_db, projects, txns) = setup();
    let p = projects.create_project("Both", None).unwrap();
    let sub = projects.observe_balances().unwrap();
    let _ = sub.recv_timeout(WAIT).unwrap();

    // A transactions-table write re-emits.
    txns.add_expense(p.id, 200, "Tape", NewEntry::default())
        .unwrap();
    let mut saw_debit = false;
    while let Some(snapshot) = sub.recv_timeout(WAIT) {
        if snapshot[0].balance_minor == -200 {
            saw_debit = true;
            break;
        }
    }
    assert!(saw_debit);

    // A projects-table write re-emits too.
    projects.create_project("Second", None).unwrap();
    let mut saw_two = false;
    while let Some(snapshot) = sub.recv_timeout(WAIT) {
        if snapshot.len() == 2 {
            saw_two = true;
            break;
        }
    }
    assert!(saw_two);
}

#[test]
fn unrelated_tables_do_not_wake_the_projects_query() {
    let (db, projects, _txns) = setup();
    projects.create_project("Quiet", None).unwrap();
    let sub = projects.observe_projects().unwrap();
    let _ = sub.recv_timeout(WAIT).unwrap();

    let categories = CategoryRepository::new(Arc::clone(&db));
    categories.add_category("Noise").unwrap();

    assert!(sub.recv_timeout(Duration::from_millis(800)).is_none());
}

#[test]
fn reattach_within_grace_reuses_the_cached_snapshot() {
    let (_db, projects, _txns) = setup();
    projects.create_project("Sticky", None).unwrap();

    let first = projects.observe_projects().unwrap();
    let snapshot = first.recv_timeout(WAIT).unwrap();
    first.cancel();

    // Same repository slot, inside the grace window: the cached snapshot
    // arrives without a fresh query run.
    let second = projects.observe_projects().unwrap();
    let cached = second.recv_timeout(WAIT).unwrap();
    assert_eq!(cached, snapshot);
}

#[test]
fn trash_flow_notifies_every_affected_observer() {
    let (db, projects, txns) = setup();
    let trash = DeletedProjectRepository::new(Arc::clone(&db));
    let p = projects.create_project("Doomed", None).unwrap();
    txns.add_income(p.id, 100, "x", NewEntry::default()).unwrap();

    let project_sub = projects.observe_projects().unwrap();
    let trash_sub = trash.observe_deleted_projects().unwrap();
    let _ = project_sub.recv_timeout(WAIT).unwrap();
    let initial_trash = trash_sub.recv_timeout(WAIT).unwrap();
    assert!(initial_trash.is_empty());

    trash.move_to_trash(&p).unwrap();

    let mut projects_empty = false;
    while let Some(snapshot) = project_sub.recv_timeout(WAIT) {
        if snapshot.is_empty() {
            projects_empty = true;
            break;
        }
    }
    assert!(projects_empty);

    let mut trashed = false;
    while let Some(snapshot) = trash_sub.recv_timeout(WAIT) {
        if snapshot.len() == 1 && snapshot[0].original_id == p.id {
            trashed = true;
            break;
        }
    }
    assert!(trashed);
}
