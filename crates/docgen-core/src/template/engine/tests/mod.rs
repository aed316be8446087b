//! Tests for template engine
//!
//! Organized by concern: plain substitution, missing-key policies,
//! delimiter handling and malformed input.

use super::*;

// Test helper functions
mod helpers;

mod render_delimiters;
