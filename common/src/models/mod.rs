//! Shared data models.

pub mod query;

// Re-export commonly used types
pub use query::{MutationSummary, NumberFormat, QueryOutcome, QueryRequest, Row, MAX_SAFE_INTEGER};
