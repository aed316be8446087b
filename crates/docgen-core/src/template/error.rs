//! Template error types

use std::fmt;

/// Template rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Key not found in details while the missing-key policy is `error`
    UndefinedKey {
        /// The key that was not found
        key: String,
        /// Line number where the placeholder starts
        line: usize,
    },

    /// Malformed template syntax
    MalformedSyntax {
        /// Error message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Delimiter or policy configuration rejected before rendering
    InvalidOptions {
        /// Why the options were rejected
        reason: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedKey { key, line } => {
                write!(f, "Undefined key '{}' at line {}", key, line)
            }
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::InvalidOptions { reason } => {
                write!(f, "Invalid render options: {}", reason)
            }
        }
    }
}

impl std::error::Error for TemplateError {}
