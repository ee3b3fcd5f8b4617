// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::observe::{LiveQuery, Subscription, Table};
use crate::store;
use crate::utils::now_ms;

/// Optional attributes of a new income/expense entry.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub timestamp_ms: Option<i64>,
    pub category_id: Option<i64>,
    pub notes: Option<String>,
}

/// Income/expense recording and retrieval. Amounts are minor currency
/// units; the sign lives in which of credit/debit is populated.
pub struct TransactionRepository {
    db: Arc<Database>,
    per_project: Mutex<HashMap<i64, LiveQuery<Vec<Transaction>>>>,
    all_query: Mutex<Option<LiveQuery<Vec<Transaction>>>>,
}

impl TransactionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            per_project: Mutex::new(HashMap::new()),
            all_query: Mutex::new(None),
        }
    }

    pub fn add_income(
        &self,
        project_id: i64,
        amount_minor: i64,
        title: &str,
        entry: NewEntry,
    ) -> Result<i64> {
        self.add(project_id, amount_minor, 0, title, entry)
    }

    pub fn add_expense(
        &self,
        project_id: i64,
        amount_minor: i64,
        title: &str,
        entry: NewEntry,
    ) -> Result<i64> {
        self.add(project_id, 0, amount_minor, title, entry)
    }

    fn add(
        &self,
        project_id: i64,
        credit_minor: i64,
        debit_minor: i64,
        title: &str,
        entry: NewEntry,
    ) -> Result<i64> {
        if credit_minor + debit_minor <= 0 {
            return Err(Error::NonPositiveAmount);
        }
        let t = Transaction {
            id: 0,
            project_id,
            timestamp_ms: entry.timestamp_ms.unwrap_or_else(now_ms),
            title: title.to_string(),
            notes: entry.notes,
            category_id: entry.category_id,
            credit_minor,
            debit_minor,
        };
        let id = {
            let conn = self.db.conn();
            if store::projects::get_by_id(&conn, project_id)?.is_none() {
                return Err(Error::ProjectNotFound(project_id));
            }
            store::transactions::insert(&conn, &t)?
        };
        self.db.changes().publish(&[Table::Transactions]);
        Ok(id)
    }

    /// In-place replace of every field; no-op when the id is absent.
    pub fn update(&self, t: &Transaction) -> Result<()> {
        {
            let conn = self.db.conn();
            store::transactions::update(&conn, t)?;
        }
        self.db.changes().publish(&[Table::Transactions]);
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        {
            let conn = self.db.conn();
            store::transactions::delete(&conn, id)?;
        }
        self.db.changes().publish(&[Table::Transactions]);
        Ok(())
    }

    /// Bulk delete for one project; step one of the trash flow when called
    /// outside it (the trash repository runs its own transactional copy).
    pub fn delete_transactions_for_project(&self, project_id: i64) -> Result<usize> {
        let n = {
            let conn = self.db.conn();
            store::transactions::delete_by_project(&conn, project_id)?
        };
        if n > 0 {
            self.db.changes().publish(&[Table::Transactions]);
        }
        Ok(n)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.db.conn();
        Ok(store::transactions::get_by_id(&conn, id)?)
    }

    pub fn list_for_project(&self, project_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.db.conn();
        Ok(store::transactions::list_by_project(&conn, project_id)?)
    }

    /// Live transaction list for one project, newest first.
    pub fn observe_transactions(&self, project_id: i64) -> Result<Subscription<Vec<Transaction>>> {
        let mut map = self.per_project.lock().unwrap();
        if let Some(q) = map.get(&project_id) {
            if let Some(sub) = q.subscribe() {
                return Ok(sub);
            }
        }
        let (q, sub) = LiveQuery::spawn_subscribed(&self.db, &[Table::Transactions], move |conn| {
            store::transactions::list_by_project(conn, project_id)
        })?;
        map.insert(project_id, q);
        Ok(sub)
    }

    pub fn observe_all_transactions(&self) -> Result<Subscription<Vec<Transaction>>> {
        super::subscribe_shared(
            &self.db,
            &self.all_query,
            &[Table::Transactions],
            store::transactions::list_all,
        )
    }
}
