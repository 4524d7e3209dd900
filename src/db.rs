//! Database pool construction and startup schema creation.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

const CREATE_USERS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

// user_id holds the stringified owner id carried in the token subject, so it
// is a VARCHAR column rather than a foreign key to users.id.
const CREATE_TASKS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
    id SERIAL PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    title VARCHAR(200) NOT NULL,
    description VARCHAR(1000),
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_TASKS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks (user_id)";

/// Builds the connection pool used for the lifetime of the process. Every
/// request acquires a connection from this pool and releases it when the
/// request ends.
pub async fn connect_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "connecting to database (max_connections={})",
        config.db_max_connections
    );

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await
}

/// Creates the tables on startup if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_TASKS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_TASKS_OWNER_INDEX).execute(pool).await?;
    log::info!("database schema is up to date");
    Ok(())
}
