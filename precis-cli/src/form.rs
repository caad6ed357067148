//! Four-flag form state shared by every front end: input, summary, loading,
//! error. A submission either fills the summary or the error, never both.

/// Anything that can turn text into a summary or a displayable error.
pub trait SummarizeBackend {
    fn summarize(&self, text: &str) -> Result<String, String>;
}

pub const BLANK_INPUT_MESSAGE: &str = "Please enter some text to summarize.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub input_text: String,
    pub summary_text: String,
    pub loading: bool,
    pub error_message: String,
}

impl FormState {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            ..Default::default()
        }
    }

    /// Start a submission. Returns the text to send, or `None` (with the
    /// error set) when the input is blank.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.input_text.trim().is_empty() {
            self.summary_text.clear();
            self.error_message = BLANK_INPUT_MESSAGE.to_string();
            return None;
        }

        self.loading = true;
        self.error_message.clear();
        self.summary_text.clear();
        Some(self.input_text.clone())
    }

    /// Finish a submission with the backend's outcome.
    pub fn finish_submit(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(summary) => self.summary_text = summary,
            Err(message) => self.error_message = message,
        }
        self.loading = false;
    }

    pub fn submit(&mut self, backend: &impl SummarizeBackend) {
        if let Some(text) = self.begin_submit() {
            let outcome = backend.summarize(&text);
            self.finish_submit(outcome);
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}
