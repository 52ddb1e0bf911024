//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! - **Tutorials** — the [`TutorialRepository`]: either the in-memory
//!   [`TutorialStore`] or the Postgres `tutorials` table, never both.
//! - **Metrics handle** — optional Prometheus handle rendering `/metrics`.

use std::collections::HashMap;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use sqlx::PgPool;
use tutorial_core::{Tutorial, TutorialId};

use crate::config::AppConfig;
use crate::repository::TutorialRepository;

// -- Tutorial Store -----------------------------------------------------------

/// Thread-safe, cloneable in-memory tutorial store. Backs the repository
/// when no database is configured.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable.
///
/// Each record carries an insertion sequence number so listings are stable
/// even when two records share a creation timestamp.
#[derive(Debug, Clone, Default)]
pub struct TutorialStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    records: HashMap<TutorialId, (u64, Tutorial)>,
}

impl TutorialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the previous value if the id existed.
    pub fn insert(&self, tutorial: Tutorial) -> Option<Tutorial> {
        let mut guard = self.inner.write();
        let seq = guard.next_seq;
        guard.next_seq += 1;
        guard
            .records
            .insert(tutorial.id, (seq, tutorial))
            .map(|(_, previous)| previous)
    }

    /// Retrieve a record by id.
    pub fn get(&self, id: &TutorialId) -> Option<Tutorial> {
        self.inner.read().records.get(id).map(|(_, t)| t.clone())
    }

    /// List records matching `predicate`, oldest first.
    pub fn list_where(&self, predicate: impl Fn(&Tutorial) -> bool) -> Vec<Tutorial> {
        let guard = self.inner.read();
        let mut records: Vec<&(u64, Tutorial)> = guard
            .records
            .values()
            .filter(|(_, t)| predicate(t))
            .collect();
        records.sort_by(|(seq_a, a), (seq_b, b)| {
            a.created_at.cmp(&b.created_at).then(seq_a.cmp(seq_b))
        });
        records.into_iter().map(|(_, t)| t.clone()).collect()
    }

    /// List every record, oldest first.
    pub fn list(&self) -> Vec<Tutorial> {
        self.list_where(|_| true)
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under a single write lock. Returns `None` if the
    /// record doesn't exist, or `Some(result)` with the closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        id: &TutorialId,
        f: impl FnOnce(&mut Tutorial) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.inner.write().records.get_mut(id).map(|(_, t)| f(t))
    }

    /// Remove a record by id.
    pub fn remove(&self, id: &TutorialId) -> Option<Tutorial> {
        self.inner.write().records.remove(id).map(|(_, t)| t)
    }

    /// Remove every record, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut guard = self.inner.write();
        let removed = guard.records.len();
        guard.records.clear();
        removed
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tutorials: TutorialRepository,
    pub metrics: Option<PrometheusHandle>,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tutorials", &self.tutorials.backend())
            .field("metrics", &self.metrics.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// In-memory state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            tutorials: TutorialRepository::in_memory(),
            metrics: None,
            config,
        }
    }

    /// Serve tutorials from Postgres when a pool is given; otherwise keep
    /// the current repository.
    pub fn with_db_pool(mut self, pool: Option<PgPool>) -> Self {
        if let Some(pool) = pool {
            self.tutorials = TutorialRepository::postgres(pool);
        }
        self
    }

    /// Attach a Prometheus handle; mounts `/metrics`.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
