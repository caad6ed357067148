//! Best-effort persistence of summaries.
//!
//! `SummaryStore` is injected into the summarization service. `PgSummaryStore`
//! connects once at startup; if that fails (or no URL is configured) it stays
//! in degraded mode for the life of the process and every `save` is skipped.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{NewSummary, SummaryRecord};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to write summary: {0}")]
    Write(#[source] sqlx::Error),

    #[error("Failed to read summaries: {0}")]
    Read(#[source] sqlx::Error),
}

/// Result of a write that did not fail.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved(SummaryRecord),
    /// No connection; nothing was written.
    Skipped,
}

#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Whether a connection is currently established.
    fn is_available(&self) -> bool;

    /// Insert one record. A no-op returning `Skipped` when unavailable.
    async fn save(&self, record: NewSummary) -> Result<SaveOutcome, PersistenceError>;

    /// Most recent records, newest first. Empty when unavailable.
    async fn recent(&self, limit: i64) -> Result<Vec<SummaryRecord>, PersistenceError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Default)]
pub struct PgSummaryStore {
    pool: Option<PgPool>,
}

impl PgSummaryStore {
    /// Attempt the one and only connection. Never fails; a store that could
    /// not connect simply reports itself unavailable.
    pub async fn connect(config: &DatabaseConfig) -> Self {
        let Some(url) = config.url.as_deref() else {
            tracing::info!("No database URL configured - summaries will not be saved");
            return Self::disabled();
        };

        match crate::db::connect_and_migrate(url, config).await {
            Ok(pool) => {
                tracing::info!("Connected to PostgreSQL successfully");
                Self::from_pool(pool)
            }
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL connection failed - continuing without persistence");
                Self::disabled()
            }
        }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref().filter(|p| !p.is_closed())
    }

    pub async fn count(&self) -> Result<i64, PersistenceError> {
        let Some(pool) = self.pool() else {
            return Ok(0);
        };
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM summaries")
            .fetch_one(pool)
            .await
            .map_err(PersistenceError::Read)?;
        Ok(row.0)
    }
}

#[async_trait]
impl SummaryStore for PgSummaryStore {
    fn is_available(&self) -> bool {
        self.pool().is_some()
    }

    async fn save(&self, record: NewSummary) -> Result<SaveOutcome, PersistenceError> {
        let Some(pool) = self.pool() else {
            tracing::info!("PostgreSQL not connected - skipping save");
            return Ok(SaveOutcome::Skipped);
        };

        let saved = sqlx::query_as::<_, SummaryRecord>(
            r#"
            INSERT INTO summaries (id, input_text, summary_text)
            VALUES ($1, $2, $3)
            RETURNING id, input_text, summary_text, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.input_text)
        .bind(&record.summary_text)
        .fetch_one(pool)
        .await
        .map_err(PersistenceError::Write)?;

        tracing::info!(id = %saved.id, "Summary saved to PostgreSQL");
        Ok(SaveOutcome::Saved(saved))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<SummaryRecord>, PersistenceError> {
        let Some(pool) = self.pool() else {
            return Ok(Vec::new());
        };

        sqlx::query_as::<_, SummaryRecord>(
            r#"
            SELECT id, input_text, summary_text, created_at
            FROM summaries
            ORDER BY created_at DESC, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(PersistenceError::Read)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
