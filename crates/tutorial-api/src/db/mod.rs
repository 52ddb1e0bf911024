//! # Database Persistence Layer
//!
//! Provides Postgres persistence for tutorials via SQLx.
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, the
//! `tutorials` table is the document store and every request queries it
//! directly. When absent, the API operates in in-memory-only mode
//! (suitable for development and testing).

pub mod tutorials;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if no URL is configured (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let url = match url {
        Some(url) => url,
        None => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Tutorials will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Round-trip a trivial query to verify the pool can reach the server.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
