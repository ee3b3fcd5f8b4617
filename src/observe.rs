// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rusqlite::Connection;

use crate::db::Database;
use crate::error::Result;

/// How long a live query outlives its last subscriber. A consumer that
/// detaches and reattaches inside this window gets the cached snapshot back
/// without the query re-running.
pub const RESUBSCRIBE_GRACE: Duration = Duration::from_secs(5);

const TICK: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Projects,
    Transactions,
    Categories,
    DeletedProjects,
}

struct BusEntry {
    id: u64,
    tables: Vec<Table>,
    wake: Sender<()>,
}

/// Table-change fan-out. Repositories publish the tables they touched after
/// each committed write; every live query registered for one of those tables
/// is woken and re-runs.
pub struct ChangeBus {
    entries: Mutex<Vec<BusEntry>>,
    next_id: AtomicU64,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Notify every live query watching any of `tables`. Entries whose
    /// worker has gone away are dropped here.
    pub fn publish(&self, tables: &[Table]) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|e| {
            if e.tables.iter().any(|t| tables.contains(t)) {
                e.wake.send(()).is_ok()
            } else {
                true
            }
        });
    }

    fn register(&self, tables: &[Table]) -> (u64, Receiver<()>) {
        let (wake, woken) = mpsc::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().unwrap().push(BusEntry {
            id,
            tables: tables.to_vec(),
            wake,
        });
        (id, woken)
    }

    fn unregister(&self, id: u64) {
        self.entries.lock().unwrap().retain(|e| e.id != id);
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

struct SubsState<T> {
    senders: Vec<(u64, Sender<T>)>,
    // None while at least one subscriber is attached.
    idle_since: Option<Instant>,
    alive: bool,
}

struct Shared<T> {
    latest: Mutex<Option<T>>,
    subs: Mutex<SubsState<T>>,
    next_sub_id: AtomicU64,
}

/// A query kept live against the database: a worker thread re-runs it on
/// every relevant table change and pushes the fresh snapshot to all
/// subscribers. The worker tears down [RESUBSCRIBE_GRACE] after the last
/// subscriber detaches.
pub struct LiveQuery<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Consumer handle for a [LiveQuery]. Every received value is a full fresh
/// snapshot; dropping the handle cancels the subscription.
pub struct Subscription<T> {
    id: u64,
    rx: Receiver<T>,
    shared: Arc<Shared<T>>,
}

impl<T> Subscription<T> {
    /// Block until the next snapshot. `None` once the live query is gone.
    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut st = self.shared.subs.lock().unwrap();
        st.senders.retain(|(id, _)| *id != self.id);
        if st.senders.is_empty() && st.idle_since.is_none() {
            st.idle_since = Some(Instant::now());
        }
    }
}

impl<T: Clone + Send + 'static> LiveQuery<T> {
    /// Run `query` once, cache the snapshot, and keep it live: the worker
    /// re-runs it whenever one of `tables` changes. The initial query error,
    /// if any, surfaces to the caller; re-query failures are logged and the
    /// previous snapshot stands.
    pub fn spawn<F>(db: &Arc<Database>, tables: &[Table], query: F) -> Result<Self>
    where
        F: Fn(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let initial = {
            let conn = db.conn();
            query(&conn)?
        };

        let shared = Arc::new(Shared {
            latest: Mutex::new(Some(initial)),
            subs: Mutex::new(SubsState {
                senders: Vec::new(),
                idle_since: Some(Instant::now()),
                alive: true,
            }),
            next_sub_id: AtomicU64::new(1),
        });

        let (bus_id, woken) = db.changes().register(tables);
        let worker_db = Arc::clone(db);
        let worker_shared = Arc::clone(&shared);
        thread::spawn(move || {
            run_worker(worker_db, worker_shared, bus_id, woken, query);
        });

        Ok(Self { shared })
    }

    /// Spawn and attach the first subscriber in one step. The fresh worker
    /// cannot lapse before the attach: its grace window opens at spawn.
    pub fn spawn_subscribed<F>(
        db: &Arc<Database>,
        tables: &[Table],
        query: F,
    ) -> Result<(Self, Subscription<T>)>
    where
        F: Fn(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let q = Self::spawn(db, tables, query)?;
        let (tx, rx) = mpsc::channel();
        let id = q.shared.next_sub_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut st = q.shared.subs.lock().unwrap();
            st.senders.push((id, tx.clone()));
            st.idle_since = None;
        }
        if let Some(snapshot) = q.shared.latest.lock().unwrap().clone() {
            let _ = tx.send(snapshot);
        }
        let sub = Subscription {
            id,
            rx,
            shared: Arc::clone(&q.shared),
        };
        Ok((q, sub))
    }

    /// Attach a new subscriber. It immediately receives the cached snapshot.
    /// Returns `None` if the worker already tore down; callers then spawn a
    /// fresh [LiveQuery].
    pub fn subscribe(&self) -> Option<Subscription<T>> {
        let (tx, rx) = mpsc::channel();
        let id = self.shared.next_sub_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut st = self.shared.subs.lock().unwrap();
            if !st.alive {
                return None;
            }
            st.senders.push((id, tx.clone()));
            st.idle_since = None;
        }
        // A fan-out racing this attach may deliver a duplicate snapshot;
        // consumers treat every received value as a full refresh.
        if let Some(snapshot) = self.shared.latest.lock().unwrap().clone() {
            let _ = tx.send(snapshot);
        }
        Some(Subscription {
            id,
            rx,
            shared: Arc::clone(&self.shared),
        })
    }
}

fn run_worker<T, F>(
    db: Arc<Database>,
    shared: Arc<Shared<T>>,
    bus_id: u64,
    woken: Receiver<()>,
    query: F,
) where
    T: Clone + Send + 'static,
    F: Fn(&Connection) -> rusqlite::Result<T> + Send + 'static,
{
    loop {
        match woken.recv_timeout(TICK) {
            Ok(()) => {
                // Coalesce bursts of writes into one re-query.
                while woken.try_recv().is_ok() {}
                let fresh = {
                    let conn = db.conn();
                    query(&conn)
                };
                match fresh {
                    Ok(snapshot) => {
                        *shared.latest.lock().unwrap() = Some(snapshot.clone());
                        let mut st = shared.subs.lock().unwrap();
                        st.senders.retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
                        if st.senders.is_empty() && st.idle_since.is_none() {
                            st.idle_since = Some(Instant::now());
                        }
                    }
                    Err(err) => {
                        tracing::error!("live query re-run failed: {err}");
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let mut st = shared.subs.lock().unwrap();
        if st.senders.is_empty() {
            let expired = st
                .idle_since
                .map(|t| t.elapsed() >= RESUBSCRIBE_GRACE)
                .unwrap_or(false);
            if expired {
                st.alive = false;
                break;
            }
        }
    }
    db.changes().unregister(bus_id);
}
