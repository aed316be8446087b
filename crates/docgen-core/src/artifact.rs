//! Artifact classes and where a request's artifact comes from

use crate::error::{DocgenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of input a generation request is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactClass {
    Template,
    Details,
    Resource,
}

impl fmt::Display for ArtifactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactClass::Template => write!(f, "template"),
            ArtifactClass::Details => write!(f, "details"),
            ArtifactClass::Resource => write!(f, "resource"),
        }
    }
}

impl FromStr for ArtifactClass {
    type Err = DocgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "template" | "templates" | "tmpl" => Ok(ArtifactClass::Template),
            "details" | "dtls" => Ok(ArtifactClass::Details),
            "resource" | "resources" | "rsc" => Ok(ArtifactClass::Resource),
            other => Err(DocgenError::MalformedInput(format!(
                "unknown artifact class '{}'",
                other
            ))),
        }
    }
}

/// Where an artifact's content comes from for one request
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance<T> {
    /// Content embedded in the request body
    Inline(T),
    /// Identifier of a previously registered artifact
    Named(String),
}

impl<T> Provenance<T> {
    /// Pick the provenance of a required artifact.
    ///
    /// Inline content wins when both are present. Presenting neither is a
    /// malformed request.
    pub fn select(inline: Option<T>, name: Option<String>, class: ArtifactClass) -> Result<Self> {
        match (inline, name) {
            (Some(value), _) => Ok(Provenance::Inline(value)),
            (None, Some(name)) => Ok(Provenance::Named(name)),
            (None, None) => Err(DocgenError::MalformedInput(format!(
                "no {} supplied: embed it in the body or reference it by name",
                class
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_takes_precedence() {
        let p = Provenance::select(
            Some("aW5saW5l".to_string()),
            Some("hello.tex".to_string()),
            ArtifactClass::Template,
        )
        .unwrap();
        assert_eq!(p, Provenance::Inline("aW5saW5l".to_string()));
    }

    #[test]
    fn test_named_when_no_inline() {
        let p: Provenance<String> =
            Provenance::select(None, Some("hello.tex".to_string()), ArtifactClass::Template)
                .unwrap();
        assert_eq!(p, Provenance::Named("hello.tex".to_string()));
    }

    #[test]
    fn test_neither_is_malformed_input() {
        let result: Result<Provenance<String>> =
            Provenance::select(None, None, ArtifactClass::Details);
        match result {
            Err(DocgenError::MalformedInput(msg)) => assert!(msg.contains("details")),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_class_from_str() {
        assert_eq!("tmpl".parse::<ArtifactClass>().unwrap(), ArtifactClass::Template);
        assert_eq!("details".parse::<ArtifactClass>().unwrap(), ArtifactClass::Details);
        assert_eq!("resources".parse::<ArtifactClass>().unwrap(), ArtifactClass::Resource);
        assert!("pdf".parse::<ArtifactClass>().is_err());
    }
}
