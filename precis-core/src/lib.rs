pub mod config;
pub mod db;
pub mod error;
pub mod gemini;
pub mod models;
pub mod prompt;
pub mod store;

pub use config::PrecisConfig;
pub use error::PrecisError;
pub use gemini::{GeminiClient, GenerateContentResponse, GenerationError, TextGenerator};
pub use models::{NewSummary, SummaryRecord};
pub use prompt::PromptTemplate;
pub use store::{PersistenceError, PgSummaryStore, SaveOutcome, SummaryStore};
