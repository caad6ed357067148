#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use precis_core::{
    GenerateContentResponse, GenerationError, NewSummary, PersistenceError, SaveOutcome,
    SummaryRecord, SummaryStore, TextGenerator,
};

#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    NoCandidates,
    ApiError { status: u16, message: Option<String> },
    Timeout,
}

/// Records every prompt it receives and answers with a canned reply.
#[derive(Clone)]
pub struct MockGenerator {
    pub configured: bool,
    pub reply: MockReply,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            configured: true,
            reply: MockReply::Text(text.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::replying("unused")
        }
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            ..Self::replying("unused")
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            MockReply::Text(text) => Ok(GenerateContentResponse::from_text(text.clone())),
            MockReply::NoCandidates => Ok(GenerateContentResponse::default()),
            MockReply::ApiError { status, message } => Err(GenerationError::Api {
                status: *status,
                message: message.clone(),
            }),
            MockReply::Timeout => Err(GenerationError::Timeout {
                timeout: Duration::from_secs(30),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// In-memory store that can be switched off or made to fail.
#[derive(Clone)]
pub struct MockStore {
    pub available: bool,
    pub fail_with: Option<String>,
    pub saved: Arc<Mutex<Vec<SummaryRecord>>>,
    pub attempts: Arc<AtomicUsize>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            available: true,
            fail_with: None,
            saved: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockStore {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<SummaryRecord> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryStore for MockStore {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn save(&self, record: NewSummary) -> Result<SaveOutcome, PersistenceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Ok(SaveOutcome::Skipped);
        }
        if let Some(ref msg) = self.fail_with {
            return Err(PersistenceError::Write(sqlx::Error::Protocol(msg.clone())));
        }
        let saved = SummaryRecord {
            id: uuid::Uuid::new_v4(),
            input_text: record.input_text,
            summary_text: record.summary_text,
            created_at: chrono::Utc::now(),
        };
        self.saved.lock().unwrap().push(saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<SummaryRecord>, PersistenceError> {
        if !self.available {
            return Ok(Vec::new());
        }
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
