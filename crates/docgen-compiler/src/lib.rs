//! External compiler discovery and invocation for docgen.
//!
//! The compiler (pdflatex by default) is treated as an opaque executable: it
//! is run inside a request workspace on the rendered source file and must
//! leave the output document next to it.
//!
//! # Architecture
//!
//! - [`info`]: Where the compiler executable was found
//! - [`resolve`]: Executable lookup
//! - [`exec`]: Multi-pass execution with a shared timeout
//!
//! # Compiler Resolution Flow
//!
//! ```text
//! resolve_compiler()
//!     ↓
//! 1. Configured program is a path?
//!     → use it, or NotFound if it is not executable
//!     ↓ (bare name)
//! 2. DOCGEN_COMPILER set and executable?
//!     ↓ (not set)
//! 3. which::which(program)
//!     ↓ (not found)
//! 4. Return NotFound with searched locations
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use docgen_compiler::{compile, resolve_compiler, ExecOptions, ResolveOptions};
//! use docgen_core::{DocgenConfig, WorkspaceManager};
//!
//! # async fn run() -> docgen_core::Result<()> {
//! let config = DocgenConfig::default();
//! let compiler = resolve_compiler(&ResolveOptions::from_env(&config.compiler.program))?
//!     .into_info()?;
//!
//! let workspaces = WorkspaceManager::new(&config.storage.work_dir)?;
//! let workspace = workspaces.acquire().await?;
//! workspace.write_rendered("document.tex", b"\\documentclass{article}...").await?;
//!
//! let options = ExecOptions::new(&compiler, &config.compiler);
//! let compiled = compile(&workspace, "document.tex", "document.pdf", &options).await?;
//! println!("{} bytes after {} passes", compiled.output.len(), compiled.passes);
//! workspace.release().await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod exec;
pub mod info;
pub mod resolve;

// Re-export commonly used types
pub use exec::{Compiled, ExecOptions, ExecResult, compile};
pub use info::{CompilerInfo, CompilerSource};
pub use resolve::{ResolveOptions, ResolveResult, resolve_compiler};

// Type alias for convenience
pub type Result<T> = docgen_core::Result<T>;
