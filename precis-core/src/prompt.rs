//! Instruction template wrapped around submitted text.

/// Placeholder replaced by the submitted text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

pub const DEFAULT_TEMPLATE: &str = "Summarize this paper in \u{2264}150 words for a technical reader. \
Include: problem, method, main result, and one limitation: {text}";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Embed `text` into the template. Only the first placeholder is
    /// substituted, so braces inside the user's text are left alone. A
    /// template without a placeholder gets the text appended.
    pub fn render(&self, text: &str) -> String {
        match self.template.split_once(TEXT_PLACEHOLDER) {
            Some((head, tail)) => format!("{head}{text}{tail}"),
            None => format!("{}\n\n{}", self.template.trim_end(), text),
        }
    }
}
