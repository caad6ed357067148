pub mod http;
pub mod service;
pub mod ui;

pub use service::{SummarizationService, SummarizeError};
