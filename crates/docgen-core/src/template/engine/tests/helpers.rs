//! Shared test helpers for template engine tests

use crate::details::Details;
use crate::template::options::{Delimiters, MissingKeyPolicy};
use crate::template::TemplateEngine;
use serde_json::json;

/// Details with scalar values at the top level
pub(super) fn simple_details() -> Details {
    Details::from_value(json!({
        "title": "My Title",
        "count": 42,
        "price": 9.99,
        "enabled": true,
        "empty": null
    }))
    .unwrap()
}

/// Details with nested objects and arrays
pub(super) fn nested_details() -> Details {
    Details::from_value(json!({
        "paper": {
            "title": "Research Paper",
            "language": "en",
            "authors": [
                { "name": "John Doe", "email": "john@example.com" },
                { "name": "Jane Smith", "email": "jane@example.com" }
            ]
        }
    }))
    .unwrap()
}

/// Engine with the default `{{ }}` delimiters
pub(super) fn engine(policy: MissingKeyPolicy) -> TemplateEngine {
    TemplateEngine::new(Delimiters::default(), policy).unwrap()
}

/// Render with default delimiters and the `error` policy, returning a String
pub(super) fn render_str(template: &str, details: &Details) -> String {
    let bytes = engine(MissingKeyPolicy::Error)
        .render(template.as_bytes(), details)
        .unwrap();
    String::from_utf8(bytes).unwrap()
}
