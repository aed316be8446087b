//! Substitution values for a render
//!
//! Details arrive as arbitrary JSON. They are kept as a `serde_json::Value`
//! tree (string/number/bool/null/array/object) and looked up with dotted
//! paths such as `author.name` or `authors.0.email`.

use crate::error::{DocgenError, Result};
use serde_json::{Map, Value};

/// Structured details map a template is rendered against
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    root: Value,
}

impl Details {
    /// Wrap an already-parsed JSON value. The root must be an object.
    pub fn from_value(root: Value) -> Result<Self> {
        match root {
            Value::Object(_) => Ok(Self { root }),
            Value::Null => Ok(Self::empty()),
            other => Err(DocgenError::MalformedInput(format!(
                "details must be a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Parse registered details bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn empty() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a dotted path.
    ///
    /// Segments walk through objects by key and through arrays by index.
    /// Empty segments never match.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for part in path.split('.') {
            if part.is_empty() {
                return None;
            }
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Default for Details {
    fn default() -> Self {
        Self::empty()
    }
}

/// Textual form of a value inside rendered output
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
