//! Command implementations for the polls CLI

pub mod question;
pub mod serve;

pub use question::{run_question, run_seed};
pub use serve::run_serve;

use anyhow::{Context, Result};
use polls_server::db::{create_pool_with_options, migrations};
use polls_server::{PgStore, PollsConfig};

/// Connect to PostgreSQL and make sure the poll tables exist.
pub async fn connect(config: &PollsConfig) -> Result<PgStore> {
    let database_url = config.database_url.as_deref().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.polls/config.toml",
    )?;

    let pool = create_pool_with_options(database_url, config.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to prepare database schema")?;

    Ok(PgStore::new(pool))
}
