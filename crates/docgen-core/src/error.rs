use crate::artifact::ArtifactClass;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocgenError {
    // Request errors
    #[error("MALFORMED_INPUT: {0}")]
    MalformedInput(String),

    #[error("NOT_FOUND: {class} '{identifier}' is not registered in cache, disk or database")]
    NotFound {
        identifier: String,
        class: ArtifactClass,
    },

    #[error("BACKEND_UNAVAILABLE: {0}")]
    BackendUnavailable(String),

    // Rendering errors
    #[error("CONFIGURATION_ERROR: {0}")]
    Configuration(String),

    #[error("MALFORMED_TEMPLATE: {message} (line {line})")]
    MalformedTemplate { message: String, line: usize },

    #[error("MISSING_KEY: key '{key}' is not present in details (line {line})")]
    MissingKey { key: String, line: usize },

    // Compilation errors
    #[error("COMPILATION_TIMEOUT: compiler did not finish within {:.1}s", .timeout.as_secs_f64())]
    CompilationTimeout { timeout: Duration },

    #[error("COMPILATION_FAILED: {reason}")]
    CompilationFailed {
        reason: String,
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("COMPILER_NOT_FOUND: '{0}' could not be located")]
    CompilerNotFound(String),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl DocgenError {
    /// Stable machine-readable code used by the HTTP layer
    pub fn code(&self) -> &'static str {
        match self {
            DocgenError::MalformedInput(_) => "MALFORMED_INPUT",
            DocgenError::NotFound { .. } => "NOT_FOUND",
            DocgenError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            DocgenError::Configuration(_) => "CONFIGURATION_ERROR",
            DocgenError::MalformedTemplate { .. } => "MALFORMED_TEMPLATE",
            DocgenError::MissingKey { .. } => "MISSING_KEY",
            DocgenError::CompilationTimeout { .. } => "COMPILATION_TIMEOUT",
            DocgenError::CompilationFailed { .. } => "COMPILATION_FAILED",
            DocgenError::CompilerNotFound(_) => "COMPILER_NOT_FOUND",
            DocgenError::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            DocgenError::IoError(_) => "IO_ERROR",
            DocgenError::Generic(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for DocgenError {
    fn from(err: serde_json::Error) -> Self {
        DocgenError::MalformedInput(format!("invalid JSON: {}", err))
    }
}

impl From<crate::template::error::TemplateError> for DocgenError {
    fn from(err: crate::template::error::TemplateError) -> Self {
        use crate::template::error::TemplateError;
        match err {
            TemplateError::UndefinedKey { key, line } => DocgenError::MissingKey { key, line },
            TemplateError::MalformedSyntax { message, line } => {
                DocgenError::MalformedTemplate { message, line }
            }
            TemplateError::InvalidOptions { reason } => DocgenError::Configuration(reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocgenError>;
