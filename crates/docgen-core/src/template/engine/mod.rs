//! Template engine implementation

mod scan;

use crate::details::{stringify_value, Details};
use crate::template::error::TemplateError;
use crate::template::options::{Delimiters, MissingKeyPolicy};

use scan::{count_newlines, find_subslice};

/// Rendering state for a single placeholder
struct Placeholder<'a> {
    /// Bytes between the delimiters
    raw_key: &'a [u8],
    /// Full placeholder text including both delimiters
    literal: &'a [u8],
    /// Line on which the placeholder starts
    line: usize,
}

/// Template engine configured with a delimiter pair and missing-key policy
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    delimiters: Delimiters,
    policy: MissingKeyPolicy,
}

impl TemplateEngine {
    /// Create an engine, rejecting invalid delimiters before anything is rendered
    pub fn new(delimiters: Delimiters, policy: MissingKeyPolicy) -> Result<Self, TemplateError> {
        delimiters.validate()?;
        Ok(Self { delimiters, policy })
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn policy(&self) -> MissingKeyPolicy {
        self.policy
    }

    /// Render a template with the given details.
    ///
    /// Pure: the same template and details always produce the same bytes.
    pub fn render(&self, template: &[u8], details: &Details) -> Result<Vec<u8>, TemplateError> {
        let left = self.delimiters.left.as_bytes();
        let right = self.delimiters.right.as_bytes();

        let mut output = Vec::with_capacity(template.len());
        let mut line = 1;
        let mut pos = 0;

        while pos < template.len() {
            let remaining = &template[pos..];

            let Some(start) = find_subslice(remaining, left) else {
                output.extend_from_slice(remaining);
                break;
            };

            let text = &remaining[..start];
            output.extend_from_slice(text);
            line += count_newlines(text);

            let key_start = start + left.len();
            let close = find_subslice(&remaining[key_start..], right).ok_or_else(|| {
                TemplateError::MalformedSyntax {
                    message: format!(
                        "Unterminated placeholder: '{}' has no matching '{}'",
                        self.delimiters.left, self.delimiters.right
                    ),
                    line,
                }
            })?;
            let end = key_start + close + right.len();

            let placeholder = Placeholder {
                raw_key: &remaining[key_start..key_start + close],
                literal: &remaining[start..end],
                line,
            };
            self.substitute(&placeholder, details, &mut output)?;

            line += count_newlines(placeholder.raw_key);
            pos += end;
        }

        Ok(output)
    }

    /// Write the replacement for one placeholder
    fn substitute(
        &self,
        placeholder: &Placeholder,
        details: &Details,
        output: &mut Vec<u8>,
    ) -> Result<(), TemplateError> {
        let key = normalize_key(placeholder.raw_key, placeholder.line)?;

        if let Some(value) = details.lookup(key) {
            output.extend_from_slice(stringify_value(value).as_bytes());
            return Ok(());
        }

        match self.policy {
            MissingKeyPolicy::Error => Err(TemplateError::UndefinedKey {
                key: key.to_string(),
                line: placeholder.line,
            }),
            MissingKeyPolicy::Zero => Ok(()),
            MissingKeyPolicy::Nothing => {
                output.extend_from_slice(placeholder.literal);
                Ok(())
            }
        }
    }
}

/// Trim whitespace and one leading '.' from a placeholder key
fn normalize_key(raw: &[u8], line: usize) -> Result<&str, TemplateError> {
    let key = std::str::from_utf8(raw).map_err(|_| TemplateError::MalformedSyntax {
        message: "Placeholder key is not valid UTF-8".to_string(),
        line,
    })?;

    let key = key.trim();
    let key = key.strip_prefix('.').unwrap_or(key).trim();
    if key.is_empty() {
        return Err(TemplateError::MalformedSyntax {
            message: "Empty placeholder".to_string(),
            line,
        });
    }
    Ok(key)
}

/// Convenience function to render a template in one call
pub fn render(
    template: &[u8],
    details: &Details,
    delimiters: &Delimiters,
    policy: MissingKeyPolicy,
) -> Result<Vec<u8>, TemplateError> {
    TemplateEngine::new(delimiters.clone(), policy)?.render(template, details)
}

#[cfg(test)]
mod tests;
