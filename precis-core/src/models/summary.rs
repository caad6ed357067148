use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted input/summary pair. Rows are insert-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummaryRecord {
    pub id: Uuid,
    pub input_text: String,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
}

/// The write side of a `SummaryRecord`; `id` and `created_at` are assigned
/// when the row is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSummary {
    pub input_text: String,
    pub summary_text: String,
}

impl NewSummary {
    pub fn new(input_text: impl Into<String>, summary_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            summary_text: summary_text.into(),
        }
    }
}
