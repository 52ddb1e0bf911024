//! Tutorial persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tutorials` table.
//! Each is a single statement, so a request never observes a half-applied
//! change. Payload validation happens before these are called; the table
//! only enforces `NOT NULL` on the title.
//!
//! Listings are ordered by `created_at`, then by the identity column
//! `seq` so that rows sharing a timestamp keep insertion order.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tutorial_core::{TitleFilter, Tutorial, TutorialId, TutorialPatch};
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, published, created_at, updated_at";

/// Insert a new tutorial record.
pub async fn insert(pool: &PgPool, record: &Tutorial) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tutorials (id, title, description, published, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id.as_uuid())
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.published)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch one tutorial by id.
pub async fn get(pool: &PgPool, id: &TutorialId) -> Result<Option<Tutorial>, sqlx::Error> {
    let row = sqlx::query_as::<_, TutorialRow>(&format!(
        "SELECT {COLUMNS} FROM tutorials WHERE id = $1"
    ))
    .bind(id.as_uuid())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(TutorialRow::into_record))
}

/// List tutorials whose title matches `filter`, oldest first.
pub async fn list(pool: &PgPool, filter: &TitleFilter) -> Result<Vec<Tutorial>, sqlx::Error> {
    let rows = match filter.needle() {
        None => {
            sqlx::query_as::<_, TutorialRow>(&format!(
                "SELECT {COLUMNS} FROM tutorials ORDER BY created_at, seq"
            ))
            .fetch_all(pool)
            .await?
        }
        Some(needle) => {
            sqlx::query_as::<_, TutorialRow>(&format!(
                "SELECT {COLUMNS} FROM tutorials
                 WHERE title ILIKE '%' || $1 || '%'
                 ORDER BY created_at, seq"
            ))
            .bind(escape_like(needle))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(TutorialRow::into_record).collect())
}

/// List published tutorials, oldest first.
pub async fn list_published(pool: &PgPool) -> Result<Vec<Tutorial>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TutorialRow>(&format!(
        "SELECT {COLUMNS} FROM tutorials WHERE published ORDER BY created_at, seq"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(TutorialRow::into_record).collect())
}

/// Apply `patch` to one tutorial in a single statement.
///
/// Returns the updated record, or `None` if no row has that id. The patch
/// must already be validated.
pub async fn update(
    pool: &PgPool,
    id: &TutorialId,
    patch: &TutorialPatch,
    now: DateTime<Utc>,
) -> Result<Option<Tutorial>, sqlx::Error> {
    let row = sqlx::query_as::<_, TutorialRow>(&format!(
        "UPDATE tutorials
         SET title = COALESCE($2, title),
             description = CASE WHEN $3 THEN $4 ELSE description END,
             published = COALESCE($5, published),
             updated_at = $6
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id.as_uuid())
    .bind(&patch.title)
    .bind(patch.description.is_some())
    .bind(patch.description.clone().flatten())
    .bind(patch.published)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(TutorialRow::into_record))
}

/// Delete one tutorial. Returns `true` if a row was deleted.
pub async fn delete(pool: &PgPool, id: &TutorialId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tutorials WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every tutorial, returning the number of rows removed.
pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tutorials").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Count all tutorials and published tutorials.
pub async fn counts(pool: &PgPool) -> Result<(u64, u64), sqlx::Error> {
    let (total, published): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE published) FROM tutorials",
    )
    .fetch_one(pool)
    .await?;

    Ok((total.max(0) as u64, published.max(0) as u64))
}

/// Escape `LIKE` metacharacters so the needle matches literally.
/// Backslash is the default `LIKE` escape character in Postgres.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TutorialRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TutorialRow {
    fn into_record(self) -> Tutorial {
        Tutorial {
            id: TutorialId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
