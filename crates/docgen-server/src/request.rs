//! Wire model of a generation request
//!
//! Inline artifacts travel in the JSON body, named references in the query
//! string (`tmpl`, `dtls`, repeatable `rsc`).

use docgen_core::{Delimiters, DocgenError, MissingKeyPolicy, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON body of `/generate`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateBody {
    /// Base64 template source
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    /// Resource file name → base64 content
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
    #[serde(default)]
    pub delimiters: Option<Delimiters>,
    /// Parsed late so an unknown policy is a configuration error
    #[serde(default)]
    pub on_missing_key: Option<String>,
}

impl GenerateBody {
    /// An empty body is valid when every artifact is referenced by name
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn policy(&self) -> Result<MissingKeyPolicy> {
        match &self.on_missing_key {
            Some(raw) => Ok(raw.parse::<MissingKeyPolicy>()?),
            None => Ok(MissingKeyPolicy::default()),
        }
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters.clone().unwrap_or_default()
    }
}

/// Named references taken from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateQuery {
    pub template: Option<String>,
    pub details: Option<String>,
    pub resources: Vec<String>,
}

impl GenerateQuery {
    /// Parse `tmpl`, `dtls` and every `rsc` occurrence.
    ///
    /// `serde_urlencoded` keeps only one value per key, so repeated `rsc`
    /// parameters are collected by hand.
    pub fn parse(query: Option<&str>) -> Result<Self> {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return Ok(parsed);
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "tmpl" => set_once(&mut parsed.template, "tmpl", value.into_owned())?,
                "dtls" => set_once(&mut parsed.details, "dtls", value.into_owned())?,
                "rsc" => parsed.resources.push(value.into_owned()),
                other => {
                    return Err(DocgenError::MalformedInput(format!(
                        "unknown query parameter '{}'",
                        other
                    )));
                }
            }
        }
        Ok(parsed)
    }
}

fn set_once(slot: &mut Option<String>, key: &str, value: String) -> Result<()> {
    if slot.is_some() {
        return Err(DocgenError::MalformedInput(format!(
            "query parameter '{}' given more than once",
            key
        )));
    }
    *slot = Some(value);
    Ok(())
}

/// Query of `PUT /register/{class}/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterQuery {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl RegisterQuery {
    /// Delimiters the template is registered for, defaulting per side
    pub fn delimiters(&self) -> Delimiters {
        let defaults = Delimiters::default();
        Delimiters::new(
            self.left.clone().unwrap_or(defaults.left),
            self.right.clone().unwrap_or(defaults.right),
        )
    }
}
