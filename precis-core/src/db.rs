use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::PrecisError;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn create_pool(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(url)
        .await
}

/// Connect and bring the schema up to date.
pub async fn connect_and_migrate(url: &str, config: &DatabaseConfig) -> Result<PgPool, PrecisError> {
    let pool = create_pool(url, config).await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}
