// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::Result;
use crate::models::Category;
use crate::observe::{LiveQuery, Subscription, Table};
use crate::store;

pub struct CategoryRepository {
    db: Arc<Database>,
    categories_query: Mutex<Option<LiveQuery<Vec<Category>>>>,
}

impl CategoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            categories_query: Mutex::new(None),
        }
    }

    /// Create on demand: an existing name yields its established id.
    pub fn add_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        let id = {
            let conn = self.db.conn();
            store::categories::get_or_create(&conn, name)?
        };
        self.db.changes().publish(&[Table::Categories]);
        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Deleting a category nulls out `category_id` on referencing
    /// transactions, so both tables are republished.
    pub fn delete_category(&self, id: i64) -> Result<()> {
        {
            let conn = self.db.conn();
            store::categories::delete_by_id(&conn, id)?;
        }
        self.db
            .changes()
            .publish(&[Table::Categories, Table::Transactions]);
        Ok(())
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.db.conn();
        Ok(store::categories::get_by_name(&conn, name)?)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.db.conn();
        Ok(store::categories::list_all(&conn)?)
    }

    pub fn observe_categories(&self) -> Result<Subscription<Vec<Category>>> {
        super::subscribe_shared(
            &self.db,
            &self.categories_query,
            &[Table::Categories],
            store::categories::list_all,
        )
    }
}
