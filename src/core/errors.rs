//! Shared error types for conversions

use crate::core::values::DocstringFormat;
use thiserror::Error;

/// Main error type for doctrans operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoctransError {
    /// A structural parser met a call or declaration shape outside its closed set
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// An emitter was asked for a documentation dialect it cannot produce
    #[error("Unsupported docstring dialect for emission: {0}")]
    UnsupportedDialect(DocstringFormat),

    /// The Python source fragment did not parse
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A parameter carries neither type, doc nor default
    #[error("Parameter `{0}` has no type, doc or default")]
    EmptyParam(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DoctransError {
    /// Create an unsupported construct error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConstruct(message.into())
    }

    /// Create a syntax error at a 1-indexed location
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Whether the caller can fix the input and retry
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Syntax { .. } | Self::Config(_) | Self::EmptyParam(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, DoctransError>;
