//! Error types for search query parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The query string could not be tokenized at all. Semantic problems
    /// never surface here; they are annotated on the filter nodes instead.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
}

impl SearchError {
    /// Create a parse error at the given byte position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for search parsing operations.
pub type SearchResult<T> = Result<T, SearchError>;
