//! Postgres pool for the `postgres` booking backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only used when `BOOKING_BACKEND=postgres`. Startup creates the SQLx pool
//! and applies the `appointments` schema before accepting traffic.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::env_parse;

/// Overridden by `DB_MAX_CONNECTIONS`.
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Connect to `database_url` and bring the `appointments` schema up to date.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(env_parse("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS))
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
