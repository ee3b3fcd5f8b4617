// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{DeletedProject, Project};
use crate::observe::{LiveQuery, Subscription, Table};
use crate::store;
use crate::utils::now_ms;

const TRASH_RETENTION_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Recoverable project deletion. Per project the lifecycle is
/// Live -> Trashed -> restored | purged (manually or by age).
pub struct DeletedProjectRepository {
    db: Arc<Database>,
    trash_query: Mutex<Option<LiveQuery<Vec<DeletedProject>>>>,
}

impl DeletedProjectRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            trash_query: Mutex::new(None),
        }
    }

    /// Archive a live project: delete its transactions, write the snapshot,
    /// delete the live row — one SQL transaction, so a crash or a concurrent
    /// writer can never observe the project both trashed and live, or its
    /// transactions gone with the project still present.
    ///
    /// The transactions are NOT carried into the trash; restore recovers
    /// project metadata only.
    pub fn move_to_trash(&self, project: &Project) -> Result<()> {
        let snapshot = DeletedProject {
            id: 0,
            original_id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            created_at_ms: project.created_at_ms,
            deleted_at_ms: now_ms(),
        };
        {
            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            store::transactions::delete_by_project(&tx, project.id)?;
            store::trash::insert(&tx, &snapshot)?;
            store::projects::delete(&tx, project.id)?;
            tx.commit()?;
        }
        self.db.changes().publish(&[
            Table::Transactions,
            Table::DeletedProjects,
            Table::Projects,
        ]);
        tracing::info!(id = project.id, name = %project.name, "moved project to trash");
        Ok(())
    }

    /// Consume a trash record and hand back the project it described, with
    /// its original id, name, description and creation timestamp. The caller
    /// re-inserts it as a live row (see
    /// [ProjectRepository::insert_restored](crate::repo::ProjectRepository::insert_restored));
    /// the discarded transactions stay gone.
    pub fn restore_from_trash(&self, deleted: &DeletedProject) -> Result<Project> {
        let restored = Project {
            id: deleted.original_id,
            name: deleted.name.clone(),
            description: deleted.description.clone(),
            created_at_ms: deleted.created_at_ms,
            display_order: 0,
        };
        {
            let conn = self.db.conn();
            let n = store::trash::delete_by_original_id(&conn, deleted.original_id)?;
            if n == 0 {
                return Err(Error::TrashEntryNotFound(deleted.original_id));
            }
        }
        self.db.changes().publish(&[Table::DeletedProjects]);
        tracing::info!(id = deleted.original_id, name = %deleted.name, "restoring project from trash");
        Ok(restored)
    }

    /// Drop the trash record for good. No live data is left to affect;
    /// deleting an already-purged record is a no-op.
    pub fn permanently_delete(&self, deleted: &DeletedProject) -> Result<()> {
        let n = {
            let conn = self.db.conn();
            store::trash::delete_by_original_id(&conn, deleted.original_id)?
        };
        if n > 0 {
            self.db.changes().publish(&[Table::DeletedProjects]);
        }
        Ok(())
    }

    /// Purge trash records older than the 30-day retention, measured from
    /// the moment of the call. Invoked explicitly (startup, trash listing);
    /// there is no background timer.
    pub fn cleanup_old_deleted_projects(&self) -> Result<usize> {
        let cutoff = now_ms() - TRASH_RETENTION_MS;
        let n = {
            let conn = self.db.conn();
            store::trash::delete_older_than(&conn, cutoff)?
        };
        if n > 0 {
            self.db.changes().publish(&[Table::DeletedProjects]);
            tracing::info!(purged = n, "cleaned up expired trash records");
        }
        Ok(n)
    }

    pub fn get_by_original_id(&self, original_id: i64) -> Result<Option<DeletedProject>> {
        let conn = self.db.conn();
        Ok(store::trash::get_by_original_id(&conn, original_id)?)
    }

    pub fn list_deleted(&self) -> Result<Vec<DeletedProject>> {
        let conn = self.db.conn();
        Ok(store::trash::list_all(&conn)?)
    }

    /// Live trash listing, most recently deleted first.
    pub fn observe_deleted_projects(&self) -> Result<Subscription<Vec<DeletedProject>>> {
        super::subscribe_shared(
            &self.db,
            &self.trash_query,
            &[Table::DeletedProjects],
            store::trash::list_all,
        )
    }
}
