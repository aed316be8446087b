use super::consts;
use crate::error::{DocgenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// docgen.toml schema - every section is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocgenConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind() -> String {
    consts::server::BIND.to_string()
}

fn default_request_timeout_secs() -> u64 {
    consts::server::REQUEST_TIMEOUT_SECS
}

fn default_max_body_bytes() -> usize {
    consts::server::MAX_BODY_BYTES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_template_capacity")]
    pub template_capacity: usize,
    #[serde(default = "default_resource_capacity")]
    pub resource_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            template_capacity: default_template_capacity(),
            resource_capacity: default_resource_capacity(),
        }
    }
}

fn default_template_capacity() -> usize {
    consts::cache::TEMPLATE_CAPACITY
}

fn default_resource_capacity() -> usize {
    consts::cache::RESOURCE_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding registered artifacts, one flat file per identifier
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Parent of per-request workspaces
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            work_dir: default_work_dir(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(consts::storage::ROOT_DIR)
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
    #[serde(default = "default_compile_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    #[serde(default = "default_rerun_marker")]
    pub rerun_marker: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            source_extension: default_source_extension(),
            output_extension: default_output_extension(),
            timeout_secs: default_compile_timeout_secs(),
            max_passes: default_max_passes(),
            rerun_marker: default_rerun_marker(),
        }
    }
}

impl CompilerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_program() -> String {
    consts::compiler::PROGRAM.to_string()
}

fn default_args() -> Vec<String> {
    consts::compiler::ARGS.iter().map(|s| s.to_string()).collect()
}

fn default_source_extension() -> String {
    consts::compiler::SOURCE_EXTENSION.to_string()
}

fn default_output_extension() -> String {
    consts::compiler::OUTPUT_EXTENSION.to_string()
}

fn default_compile_timeout_secs() -> u64 {
    consts::compiler::TIMEOUT_SECS
}

fn default_max_passes() -> u32 {
    consts::compiler::MAX_PASSES
}

fn default_rerun_marker() -> String {
    consts::compiler::RERUN_MARKER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string; no database tier when absent
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: default_pool_size(),
        }
    }
}

fn default_pool_size() -> usize {
    consts::database::POOL_SIZE
}

impl DocgenConfig {
    /// Load docgen.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocgenError::ConfigParseError(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DocgenError::ConfigParseError(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DocgenError::ConfigParseError(e.to_string()))
    }

    /// Write docgen.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_toml()?)?;
        Ok(())
    }

    /// Reject values that would make the service unusable
    pub fn validate(&self) -> Result<()> {
        if self.cache.template_capacity == 0 {
            return Err(DocgenError::Configuration(
                "cache.template_capacity must be at least 1".to_string(),
            ));
        }
        if self.cache.resource_capacity == 0 {
            return Err(DocgenError::Configuration(
                "cache.resource_capacity must be at least 1".to_string(),
            ));
        }
        if self.compiler.program.trim().is_empty() {
            return Err(DocgenError::Configuration(
                "compiler.program cannot be empty".to_string(),
            ));
        }
        if self.compiler.timeout_secs == 0 {
            return Err(DocgenError::Configuration(
                "compiler.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.compiler.max_passes == 0 {
            return Err(DocgenError::Configuration(
                "compiler.max_passes must be at least 1".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(DocgenError::Configuration(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        for ext in [
            &self.compiler.source_extension,
            &self.compiler.output_extension,
        ] {
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(DocgenError::Configuration(format!(
                    "invalid file extension '{}'",
                    ext
                )));
            }
        }
        if self.database.url.is_some() && self.database.pool_size == 0 {
            return Err(DocgenError::Configuration(
                "database.pool_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the rendered source file inside a workspace
    pub fn source_file_name(&self) -> String {
        format!("document.{}", self.compiler.source_extension)
    }

    /// Name of the compiled document inside a workspace
    pub fn output_file_name(&self) -> String {
        format!("document.{}", self.compiler.output_extension)
    }
}
