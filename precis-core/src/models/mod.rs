pub mod summary;

pub use summary::{NewSummary, SummaryRecord};
