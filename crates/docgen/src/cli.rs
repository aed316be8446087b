//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP document generation service
    Serve(ServeArgs),

    /// Render a template against a details file without compiling
    Render(RenderArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// docgen.toml to load; defaults apply when absent
    #[arg(short, long, env = "DOCGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[arg(long, env = "DOCGEN_BIND")]
    pub bind: Option<String>,

    /// Directory holding registered artifacts
    #[arg(long, env = "DOCGEN_ROOT_DIR")]
    pub root_dir: Option<PathBuf>,

    /// Parent directory of per-request workspaces
    #[arg(long, env = "DOCGEN_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Compiler executable, a path or a name looked up on PATH
    #[arg(long)]
    pub compiler: Option<String>,

    #[arg(long, env = "DOCGEN_TEMPLATE_CACHE")]
    pub template_cache: Option<usize>,

    #[arg(long, env = "DOCGEN_RESOURCE_CACHE")]
    pub resource_cache: Option<usize>,

    #[arg(long, env = "DOCGEN_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Compiler timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file
    pub template: PathBuf,

    /// Details JSON file
    pub details: PathBuf,

    #[arg(long, default_value = "{{")]
    pub left: String,

    #[arg(long, default_value = "}}")]
    pub right: String,

    /// error, zero or nothing
    #[arg(long, default_value = "error")]
    pub on_missing_key: String,

    /// Write here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
