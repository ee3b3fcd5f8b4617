// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Project, ProjectBalance};
use crate::observe::{LiveQuery, Subscription, Table};
use crate::store;
use crate::utils::now_ms;

/// Domain operations over live projects. Writes publish their table changes
/// after the commit so live queries re-run against committed state.
pub struct ProjectRepository {
    db: Arc<Database>,
    projects_query: Mutex<Option<LiveQuery<Vec<Project>>>>,
    balances_query: Mutex<Option<LiveQuery<Vec<ProjectBalance>>>>,
}

impl ProjectRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            projects_query: Mutex::new(None),
            balances_query: Mutex::new(None),
        }
    }

    /// Create a project at the top of the display order. Both fields are
    /// trimmed; an empty description is stored as absent. Fails with a
    /// user-surfaceable error when the trimmed name is blank or collides
    /// with a live project.
    pub fn create_project(&self, name: &str, description: Option<&str>) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyProjectName);
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        let mut project = Project {
            id: 0,
            name: name.to_string(),
            description,
            created_at_ms: now_ms(),
            display_order: 0,
        };

        let id = {
            let mut conn = self.db.conn();
            if store::projects::get_by_name(&conn, name)?.is_some() {
                return Err(Error::DuplicateProjectName);
            }
            // The UNIQUE index still backstops a race between the check and
            // the insert; From<rusqlite::Error> names it for the caller.
            store::projects::insert_at_top(&mut conn, &project)?
        };
        self.db.changes().publish(&[Table::Projects]);
        tracing::debug!(id, name, "created project");

        project.id = id;
        Ok(project)
    }

    /// Full-row replace. The caller supplies every field, changed or not.
    /// Renaming onto another live project's name is rejected.
    pub fn update_project(&self, project: &Project) -> Result<()> {
        if project.name.trim().is_empty() {
            return Err(Error::EmptyProjectName);
        }
        {
            let conn = self.db.conn();
            if store::projects::find_by_name_excluding(&conn, &project.name, project.id)?.is_some()
            {
                return Err(Error::DuplicateProjectName);
            }
            store::projects::update(&conn, project)?;
        }
        self.db.changes().publish(&[Table::Projects]);
        Ok(())
    }

    /// Remove the live row. Only the trash flow and the restore path call
    /// this; end users archive via the trash instead.
    pub fn delete_project(&self, project: &Project) -> Result<()> {
        {
            let conn = self.db.conn();
            store::projects::delete(&conn, project.id)?;
        }
        self.db.changes().publish(&[Table::Projects]);
        Ok(())
    }

    /// Re-insert a project reconstructed from the trash, keeping its
    /// original id and creation timestamp, at the top of the display order.
    pub fn insert_restored(&self, project: &Project) -> Result<()> {
        {
            let mut conn = self.db.conn();
            if store::projects::get_by_name(&conn, &project.name)?.is_some() {
                return Err(Error::DuplicateProjectName);
            }
            store::projects::insert_at_top(&mut conn, project)?;
        }
        self.db.changes().publish(&[Table::Projects]);
        tracing::debug!(id = project.id, name = %project.name, "restored project");
        Ok(())
    }

    /// No validation of contiguity or uniqueness of the resulting orders;
    /// that is the caller's concern.
    pub fn update_project_order(&self, id: i64, order: i64) -> Result<()> {
        {
            let conn = self.db.conn();
            store::projects::update_display_order(&conn, id, order)?;
        }
        self.db.changes().publish(&[Table::Projects]);
        Ok(())
    }

    pub fn update_projects(&self, projects: &[Project]) -> Result<()> {
        {
            let mut conn = self.db.conn();
            store::projects::update_many(&mut conn, projects)?;
        }
        self.db.changes().publish(&[Table::Projects]);
        Ok(())
    }

    pub fn get_project_by_id(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.db.conn();
        Ok(store::projects::get_by_id(&conn, id)?)
    }

    pub fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let conn = self.db.conn();
        Ok(store::projects::get_by_name(&conn, name)?)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.db.conn();
        Ok(store::projects::list_all(&conn)?)
    }

    pub fn project_balances(&self) -> Result<Vec<ProjectBalance>> {
        let conn = self.db.conn();
        Ok(store::transactions::project_balances(&conn)?)
    }

    /// Live project list, display order ascending.
    pub fn observe_projects(&self) -> Result<Subscription<Vec<Project>>> {
        super::subscribe_shared(
            &self.db,
            &self.projects_query,
            &[Table::Projects],
            store::projects::list_all,
        )
    }

    /// Live per-project balances; re-emits when either source table changes.
    pub fn observe_balances(&self) -> Result<Subscription<Vec<ProjectBalance>>> {
        super::subscribe_shared(
            &self.db,
            &self.balances_query,
            &[Table::Projects, Table::Transactions],
            store::transactions::project_balances,
        )
    }
}
