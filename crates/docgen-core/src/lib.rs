// Core modules
pub mod artifact;
pub mod cache;
pub mod config;
pub mod details;
pub mod error;
pub mod path;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod store;
pub mod template;
pub mod workspace;

// Re-export commonly used types
pub use artifact::{ArtifactClass, Provenance};
pub use cache::{BoundedCache, CacheStats, CachedBytes};
pub use config::DocgenConfig;
pub use details::Details;
pub use error::{DocgenError, Result};
pub use resolve::{ResourceMap, Resolver};
pub use store::{ArtifactDb, MemoryDb, StoreError};
pub use template::{Delimiters, MissingKeyPolicy, TemplateEngine, TemplateError};
pub use workspace::{Workspace, WorkspaceManager};
