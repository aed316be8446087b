use crate::info::CompilerInfo;
use docgen_core::config::CompilerConfig;
use docgen_core::{DocgenError, Result, Workspace};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Lines of compiler output kept in a failure report
const DIAGNOSTIC_LINES: usize = 40;

/// Options for running the compiler against a workspace
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Budget for all passes together
    pub timeout: Duration,
    pub max_passes: u32,
    /// Substring of stdout that asks for another pass
    pub rerun_marker: String,
}

impl ExecOptions {
    pub fn new(compiler: &CompilerInfo, config: &CompilerConfig) -> Self {
        Self {
            program: compiler.path.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
            max_passes: config.max_passes.max(1),
            rerun_marker: config.rerun_marker.clone(),
        }
    }
}

/// Result of one compiler invocation
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ExecResult {
    fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// A successfully compiled document
#[derive(Debug, Clone)]
pub struct Compiled {
    pub output: Vec<u8>,
    pub passes: u32,
    pub duration_ms: u64,
}

/// Compile `source_file` inside `workspace` and read back `output_file`.
///
/// The compiler runs with the workspace as its working directory. All passes
/// share `options.timeout`; when it elapses the running process is killed
/// and [`DocgenError::CompilationTimeout`] is returned.
pub async fn compile(
    workspace: &Workspace,
    source_file: &str,
    output_file: &str,
    options: &ExecOptions,
) -> Result<Compiled> {
    let started = Instant::now();

    let passes = match tokio::time::timeout(options.timeout, run_passes(workspace, source_file, options)).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(timeout_secs = options.timeout.as_secs_f64(), "compiler timed out");
            return Err(DocgenError::CompilationTimeout {
                timeout: options.timeout,
            });
        }
    };

    let (count, last) = passes;
    let output = workspace.read(output_file).await?.ok_or_else(|| {
        DocgenError::CompilationFailed {
            reason: format!("compiler exited successfully but produced no {}", output_file),
            exit_code: last.exit_code,
            diagnostics: diagnostics(&last),
        }
    })?;

    let duration_ms = started.elapsed().as_millis() as u64;
    tracing::info!(passes = count, bytes = output.len(), duration_ms, "document compiled");

    Ok(Compiled {
        output,
        passes: count,
        duration_ms,
    })
}

async fn run_passes(
    workspace: &Workspace,
    source_file: &str,
    options: &ExecOptions,
) -> Result<(u32, ExecResult)> {
    let mut pass = 1;
    loop {
        let result = run_once(workspace, source_file, options).await?;
        tracing::debug!(pass, exit_code = ?result.exit_code, duration_ms = result.duration_ms, "compiler pass finished");

        if !result.success() {
            let reason = match result.exit_code {
                Some(code) => format!("compiler exited with status {}", code),
                None => "compiler was terminated by a signal".to_string(),
            };
            return Err(DocgenError::CompilationFailed {
                reason,
                exit_code: result.exit_code,
                diagnostics: diagnostics(&result),
            });
        }

        let wants_rerun =
            !options.rerun_marker.is_empty() && result.stdout.contains(&options.rerun_marker);
        if !wants_rerun || pass >= options.max_passes {
            return Ok((pass, result));
        }
        pass += 1;
    }
}

async fn run_once(workspace: &Workspace, source_file: &str, options: &ExecOptions) -> Result<ExecResult> {
    let started = Instant::now();

    let output = Command::new(&options.program)
        .args(&options.args)
        .arg(source_file)
        .current_dir(workspace.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DocgenError::CompilerNotFound(options.program.display().to_string())
            }
            _ => DocgenError::CompilationFailed {
                reason: format!("failed to start {}: {}", options.program.display(), e),
                exit_code: None,
                diagnostics: String::new(),
            },
        })?;

    Ok(ExecResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

/// Tail of stdout followed by stderr
fn diagnostics(result: &ExecResult) -> String {
    let mut lines: Vec<&str> = result
        .stdout
        .lines()
        .chain(result.stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() > DIAGNOSTIC_LINES {
        lines.drain(..lines.len() - DIAGNOSTIC_LINES);
    }
    lines.join("\n")
}
