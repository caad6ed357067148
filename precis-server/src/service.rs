//! Summarization pipeline: validate → prompt → generate → persist.

use std::sync::Arc;

use precis_core::{
    GenerationError, NewSummary, PersistenceError, PromptTemplate, SaveOutcome, SummaryRecord,
    SummaryStore, TextGenerator,
};
use thiserror::Error;

/// Detail reported when the provider answered but produced no text.
pub const NO_SUMMARY_GENERATED: &str = "No summary generated";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("Text is required")]
    Validation,

    #[error("Gemini API key not configured")]
    Configuration,

    #[error("Failed to summarize text")]
    Upstream { details: String },
}

impl SummarizeError {
    fn upstream(e: &GenerationError) -> Self {
        let details = e
            .provider_message()
            .map(str::to_string)
            .unwrap_or_else(|| e.to_string());
        SummarizeError::Upstream { details }
    }
}

#[derive(Clone)]
pub struct SummarizationService {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn SummaryStore>,
    prompt: PromptTemplate,
}

impl SummarizationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn SummaryStore>,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            generator,
            store,
            prompt,
        }
    }

    /// Summarize `text`. Validation and configuration problems are reported
    /// before any network call; persistence problems are never reported.
    pub async fn summarize(&self, text: Option<&str>) -> Result<String, SummarizeError> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Err(SummarizeError::Validation),
        };

        if !self.generator.is_configured() {
            tracing::error!("Summarize request rejected: Gemini API key not configured");
            return Err(SummarizeError::Configuration);
        }

        let prompt = self.prompt.render(text);

        tracing::info!(
            backend = self.generator.name(),
            input_chars = text.len(),
            "Requesting summary"
        );

        let response = match self.generator.generate(&prompt).await {
            Ok(r) => r,
            Err(GenerationError::NotConfigured) => return Err(SummarizeError::Configuration),
            Err(e) => {
                tracing::error!(error = %e, "Error calling Gemini API");
                return Err(SummarizeError::upstream(&e));
            }
        };

        let summary = match response.first_text() {
            Some(s) => s.to_string(),
            None => {
                tracing::error!(
                    candidates = response.candidates.len(),
                    block_reason = response.block_reason().unwrap_or("none"),
                    "No summary text found in response"
                );
                return Err(SummarizeError::Upstream {
                    details: NO_SUMMARY_GENERATED.to_string(),
                });
            }
        };

        tracing::info!(summary_chars = summary.len(), "Summary generated successfully");

        self.persist(text, &summary).await;

        Ok(summary)
    }

    /// One best-effort write. The result is logged and dropped.
    async fn persist(&self, text: &str, summary: &str) {
        match self.store.save(NewSummary::new(text, summary)).await {
            Ok(SaveOutcome::Saved(record)) => {
                tracing::debug!(id = %record.id, "Summary persisted");
            }
            Ok(SaveOutcome::Skipped) => {
                tracing::debug!(store = self.store.name(), "Persistence unavailable, summary not saved");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save summary");
            }
        }
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<SummaryRecord>, PersistenceError> {
        self.store.recent(limit).await
    }

    pub fn persistence_available(&self) -> bool {
        self.store.is_available()
    }

    pub fn credential_configured(&self) -> bool {
        self.generator.is_configured()
    }
}
