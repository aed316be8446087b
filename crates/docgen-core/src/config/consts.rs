//! Default values shared by the config model and the CLI

/// HTTP server defaults
pub mod server {
    pub const BIND: &str = "127.0.0.1:8080";
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    /// 32MB, enough for inline base64 resources
    pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;
}

/// Cache sizing
pub mod cache {
    pub const TEMPLATE_CAPACITY: usize = 64;
    pub const RESOURCE_CAPACITY: usize = 128;
}

/// Local storage layout
pub mod storage {
    pub const ROOT_DIR: &str = "registry";
}

/// External compiler invocation
pub mod compiler {
    pub const PROGRAM: &str = "pdflatex";
    pub const ARGS: &[&str] = &["-interaction=nonstopmode", "-halt-on-error"];
    pub const SOURCE_EXTENSION: &str = "tex";
    pub const OUTPUT_EXTENSION: &str = "pdf";
    pub const TIMEOUT_SECS: u64 = 60;
    pub const MAX_PASSES: u32 = 2;
    /// pdflatex prints this when cross references need another pass
    pub const RERUN_MARKER: &str = "Rerun to get";
    /// Environment variable consulted when no explicit compiler path is given
    pub const PATH_ENV: &str = "DOCGEN_COMPILER";
}

/// Database pool
pub mod database {
    pub const POOL_SIZE: usize = 8;
}
