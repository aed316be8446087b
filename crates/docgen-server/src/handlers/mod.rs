//! HTTP endpoints
//!
//! - `GET|POST /generate`: render and compile a document
//! - `PUT /register/:class/:name`: store a named artifact
//! - `GET /health`: database reachability and cache counters

pub mod generate;
pub mod health;
pub mod register;

pub use generate::generate;
pub use health::health;
pub use register::register;
