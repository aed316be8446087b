use crate::info::{CompilerInfo, CompilerSource};
use docgen_core::config::consts::compiler::PATH_ENV;
use docgen_core::{DocgenError, Result};
use std::path::{Path, PathBuf};

/// Options for locating the compiler executable
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Configured program: a bare name looked up on PATH, or a path
    pub program: String,
    /// Value of `DOCGEN_COMPILER`, consulted before PATH
    pub env_override: Option<PathBuf>,
}

impl ResolveOptions {
    /// Options for `program`, reading the override from the process environment
    pub fn from_env(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            env_override: std::env::var_os(PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Result of compiler resolution
#[derive(Debug, Clone)]
pub enum ResolveResult {
    Resolved(CompilerInfo),
    NotFound {
        program: String,
        searched_locations: Vec<String>,
    },
}

impl ResolveResult {
    /// Turn `NotFound` into [`DocgenError::CompilerNotFound`]
    pub fn into_info(self) -> Result<CompilerInfo> {
        match self {
            ResolveResult::Resolved(info) => Ok(info),
            ResolveResult::NotFound {
                program,
                searched_locations,
            } => Err(DocgenError::CompilerNotFound(format!(
                "{} (searched: {})",
                program,
                searched_locations.join(", ")
            ))),
        }
    }
}

/// A bare program name contains no separator and is looked up on PATH
fn is_bare_name(program: &str) -> bool {
    let path = Path::new(program);
    path.components().count() == 1 && !path.is_absolute()
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Resolve the compiler executable
///
/// Resolution priority:
/// 1. Configured program when it is a path
/// 2. `DOCGEN_COMPILER`
/// 3. Configured program name on the system PATH
/// 4. NotFound
pub fn resolve_compiler(options: &ResolveOptions) -> Result<ResolveResult> {
    let mut searched = Vec::new();

    if options.program.trim().is_empty() {
        return Err(DocgenError::Configuration(
            "compiler program cannot be empty".to_string(),
        ));
    }

    if !is_bare_name(&options.program) {
        let path = PathBuf::from(&options.program);
        if is_executable_file(&path) {
            return Ok(ResolveResult::Resolved(CompilerInfo {
                source: CompilerSource::Explicit,
                path,
            }));
        }
        // An explicit path that does not exist is final
        searched.push(format!("explicit: {}", path.display()));
        return Ok(ResolveResult::NotFound {
            program: options.program.clone(),
            searched_locations: searched,
        });
    }

    if let Some(path) = &options.env_override {
        if is_executable_file(path) {
            return Ok(ResolveResult::Resolved(CompilerInfo {
                source: CompilerSource::Environment,
                path: path.clone(),
            }));
        }
        tracing::warn!(path = %path.display(), "{} does not point to an executable", PATH_ENV);
        searched.push(format!("{}: {}", PATH_ENV, path.display()));
    }

    match which::which(&options.program) {
        Ok(path) => Ok(ResolveResult::Resolved(CompilerInfo {
            source: CompilerSource::System,
            path,
        })),
        Err(_) => {
            searched.push(format!("PATH: {}", options.program));
            Ok(ResolveResult::NotFound {
                program: options.program.clone(),
                searched_locations: searched,
            })
        }
    }
}
