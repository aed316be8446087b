//! HTTP orchestrator for docgen.
//!
//! Accepts generation requests, drives each one through the
//! [`pipeline`] and maps failures onto HTTP statuses in [`errors`].

pub mod db;
pub mod errors;
pub mod handlers;
pub mod pipeline;
pub mod request;
pub mod server;
pub mod state;

pub use db::PgArtifactDb;
pub use errors::ApiError;
pub use pipeline::{Failed, Generated, Stage};
pub use server::{router, serve};
pub use state::AppState;
