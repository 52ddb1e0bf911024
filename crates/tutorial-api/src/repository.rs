//! # Tutorial Repository
//!
//! The document store behind the handlers. Exactly one backend serves a
//! process:
//!
//! - **Memory** — the [`TutorialStore`] map, used when no `DATABASE_URL`
//!   is configured. Records live as long as the process.
//! - **Postgres** — every call is one query against the `tutorials`
//!   table. Nothing is kept in process memory, so replicas sharing the
//!   database see each other's writes immediately.
//!
//! Validation runs before the backend is touched, so a rejected request
//! never changes stored state.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tutorial_core::{TitleFilter, Tutorial, TutorialId, TutorialPatch, ValidationError};

use crate::db;
use crate::state::TutorialStore;

/// Errors raised by a repository operation.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The payload broke a Tutorial invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database rejected or failed the query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Tutorial counts reported on the metrics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TutorialCounts {
    pub total: u64,
    pub published: u64,
}

/// Storage backend for tutorials.
#[derive(Debug, Clone)]
pub enum TutorialRepository {
    Memory(TutorialStore),
    Postgres(PgPool),
}

impl Default for TutorialRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TutorialRepository {
    /// An empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::Memory(TutorialStore::new())
    }

    /// A repository backed by the `tutorials` table.
    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(pool)
    }

    /// The database pool, when Postgres-backed.
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Memory(_) => None,
            Self::Postgres(pool) => Some(pool),
        }
    }

    /// Short backend name for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Store a new record.
    pub async fn insert(&self, record: &Tutorial) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => {
                store.insert(record.clone());
            }
            Self::Postgres(pool) => db::tutorials::insert(pool, record).await?,
        }
        Ok(())
    }

    /// Fetch one record.
    pub async fn get(&self, id: &TutorialId) -> Result<Option<Tutorial>, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.get(id)),
            Self::Postgres(pool) => Ok(db::tutorials::get(pool, id).await?),
        }
    }

    /// Records whose title matches `filter`, oldest first.
    pub async fn list(&self, filter: &TitleFilter) -> Result<Vec<Tutorial>, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.list_where(|t| filter.matches(t))),
            Self::Postgres(pool) => Ok(db::tutorials::list(pool, filter).await?),
        }
    }

    /// Published records, oldest first.
    pub async fn list_published(&self) -> Result<Vec<Tutorial>, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.list_where(|t| t.published)),
            Self::Postgres(pool) => Ok(db::tutorials::list_published(pool).await?),
        }
    }

    /// Apply `patch` to one record, stamping `updated_at` with `now`.
    ///
    /// Returns the updated record, or `None` if the id is unknown. An
    /// invalid patch is rejected before anything is read or written.
    pub async fn update(
        &self,
        id: &TutorialId,
        patch: &TutorialPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Tutorial>, RepositoryError> {
        patch.validate()?;
        match self {
            Self::Memory(store) => store
                .try_update(id, |t| patch.apply(t, now).map(|()| t.clone()))
                .transpose()
                .map_err(RepositoryError::from),
            Self::Postgres(pool) => Ok(db::tutorials::update(pool, id, patch, now).await?),
        }
    }

    /// Delete one record. Returns `true` if it existed.
    pub async fn delete(&self, id: &TutorialId) -> Result<bool, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.remove(id).is_some()),
            Self::Postgres(pool) => Ok(db::tutorials::delete(pool, id).await?),
        }
    }

    /// Delete every record, returning how many were removed.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.clear() as u64),
            Self::Postgres(pool) => Ok(db::tutorials::delete_all(pool).await?),
        }
    }

    /// Total and published record counts.
    pub async fn counts(&self) -> Result<TutorialCounts, RepositoryError> {
        match self {
            Self::Memory(store) => {
                let all = store.list();
                Ok(TutorialCounts {
                    total: all.len() as u64,
                    published: all.iter().filter(|t| t.published).count() as u64,
                })
            }
            Self::Postgres(pool) => {
                let (total, published) = db::tutorials::counts(pool).await?;
                Ok(TutorialCounts { total, published })
            }
        }
    }
}
