//! Error types for snapfeat

use thiserror::Error;

/// Result type alias for snapfeat operations
pub type Result<T> = std::result::Result<T, SnapfeatError>;

/// Main error type for snapfeat
#[derive(Error, Debug)]
pub enum SnapfeatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl SnapfeatError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}
