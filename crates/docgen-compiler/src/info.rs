use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerSource {
    /// Path given in configuration or on the command line
    Explicit,
    /// `DOCGEN_COMPILER` environment variable
    Environment,
    /// Found by name on the system PATH
    System,
}

impl fmt::Display for CompilerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerSource::Explicit => write!(f, "explicit path"),
            CompilerSource::Environment => write!(f, "environment"),
            CompilerSource::System => write!(f, "system PATH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInfo {
    pub source: CompilerSource,
    pub path: PathBuf,
}
