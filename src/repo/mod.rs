// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::Database;
use crate::error::Result;
use crate::observe::{LiveQuery, Subscription, Table};

pub mod category;
pub mod project;
pub mod transaction;
pub mod trash;

pub use category::CategoryRepository;
pub use project::ProjectRepository;
pub use transaction::TransactionRepository;
pub use trash::DeletedProjectRepository;

/// Subscribe through a repository's cached [LiveQuery] slot, respawning the
/// query when the previous worker already lapsed. A reattach inside the
/// grace window reuses the cached snapshot without re-querying.
pub(crate) fn subscribe_shared<T, F>(
    db: &Arc<Database>,
    slot: &Mutex<Option<LiveQuery<T>>>,
    tables: &[Table],
    query: F,
) -> Result<Subscription<T>>
where
    T: Clone + Send + 'static,
    F: Fn(&Connection) -> rusqlite::Result<T> + Send + 'static,
{
    let mut slot = slot.lock().unwrap();
    if let Some(q) = slot.as_ref() {
        if let Some(sub) = q.subscribe() {
            return Ok(sub);
        }
    }
    let (q, sub) = LiveQuery::spawn_subscribed(db, tables, query)?;
    *slot = Some(q);
    Ok(sub)
}
