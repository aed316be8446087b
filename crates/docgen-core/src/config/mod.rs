//! Service configuration (docgen.toml)

pub mod consts;
mod model;

pub use model::{
    CacheConfig, CompilerConfig, DatabaseConfig, DocgenConfig, ServerConfig, StorageConfig,
};
