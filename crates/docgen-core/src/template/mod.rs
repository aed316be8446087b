//! Template module - delimiter-based placeholder substitution
//!
//! Templates are opaque byte streams (typically LaTeX source). The engine
//! scans for a configurable two-character left delimiter, reads up to the
//! next right delimiter and replaces the enclosed key with a value from the
//! request's details.
//!
//! ## Syntax
//!
//! - Placeholders: `{{name}}`, `{{ name }}` or `{{.name}}` with the default delimiters
//! - Custom delimiters: `#!.name!#` with `left = "#!"`, `right = "!#"`
//! - Nested access: `{{address.city}}`, array items: `{{authors.0.name}}`
//!
//! ## Missing keys
//!
//! - `error`: the render fails with the missing key
//! - `zero`: the placeholder becomes the empty string
//! - `nothing`: the placeholder is copied to the output unchanged

pub mod engine;
pub mod error;
pub mod options;

pub use engine::{render, TemplateEngine};
pub use error::TemplateError;
pub use options::{Delimiters, MissingKeyPolicy};
