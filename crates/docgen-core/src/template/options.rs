//! Render options: delimiter pair and missing-key policy

use crate::template::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Left and right placeholder delimiters, two characters each
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Reject anything that is not exactly two non-whitespace characters per side
    pub fn validate(&self) -> Result<(), TemplateError> {
        validate_side("left", &self.left)?;
        validate_side("right", &self.right)
    }

    /// Suffix appended to a template name to form its registered identifier.
    ///
    /// A template's placeholder syntax depends on its delimiters, so the same
    /// file registered for different delimiters is a different artifact.
    pub fn suffix(&self) -> String {
        format!("{}{}", self.left, self.right)
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

fn validate_side(side: &str, delimiter: &str) -> Result<(), TemplateError> {
    let count = delimiter.chars().count();
    if count != 2 {
        return Err(TemplateError::InvalidOptions {
            reason: format!(
                "{} delimiter '{}' must be exactly two characters, found {}",
                side, delimiter, count
            ),
        });
    }
    if delimiter.chars().any(char::is_whitespace) {
        return Err(TemplateError::InvalidOptions {
            reason: format!("{} delimiter '{}' must not contain whitespace", side, delimiter),
        });
    }
    Ok(())
}

/// What to emit when a placeholder's key is absent from the details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Fail the whole render
    #[default]
    Error,
    /// Substitute the empty string
    Zero,
    /// Leave the placeholder text in place
    Nothing,
}

impl fmt::Display for MissingKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingKeyPolicy::Error => write!(f, "error"),
            MissingKeyPolicy::Zero => write!(f, "zero"),
            MissingKeyPolicy::Nothing => write!(f, "nothing"),
        }
    }
}

impl FromStr for MissingKeyPolicy {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(MissingKeyPolicy::Error),
            "zero" => Ok(MissingKeyPolicy::Zero),
            "nothing" => Ok(MissingKeyPolicy::Nothing),
            other => Err(TemplateError::InvalidOptions {
                reason: format!(
                    "unknown missing-key policy '{}' (expected error, zero or nothing)",
                    other
                ),
            }),
        }
    }
}
