mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "docgen=info,docgen_server=info,tower_http=info";
const VERBOSE_FILTER: &str = "docgen=debug,docgen_core=debug,docgen_compiler=debug,docgen_server=debug,tower_http=debug";

fn init_logging(json: bool, verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Logs go to stderr so `render` output on stdout stays clean
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json, cli.verbose);

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Render(args) => commands::render::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
