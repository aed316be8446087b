//! Serve command - run the HTTP service

use crate::cli::ServeArgs;
use crate::output::print_text;
use anyhow::{Context, Result};
use docgen_compiler::{ResolveOptions, resolve_compiler};
use docgen_core::{ArtifactDb, DocgenConfig};
use docgen_server::{AppState, PgArtifactDb};
use std::sync::Arc;

/// Load the config file (if any) and apply flag overrides on top
pub fn effective_config(args: &ServeArgs) -> Result<DocgenConfig> {
    let mut config = match &args.config {
        Some(path) => DocgenConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DocgenConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(root) = &args.root_dir {
        config.storage.root_dir = root.clone();
    }
    if let Some(work) = &args.work_dir {
        config.storage.work_dir = work.clone();
    }
    if let Some(compiler) = &args.compiler {
        config.compiler.program = compiler.clone();
    }
    if let Some(capacity) = args.template_cache {
        config.cache.template_capacity = capacity;
    }
    if let Some(capacity) = args.resource_cache {
        config.cache.resource_capacity = capacity;
    }
    if let Some(url) = &args.database_url {
        config.database.url = Some(url.clone());
    }
    if let Some(timeout) = args.timeout {
        config.compiler.timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

pub fn run(args: ServeArgs) -> Result<()> {
    let config = effective_config(&args)?;
    let compiler = resolve_compiler(&ResolveOptions::from_env(&config.compiler.program))?
        .into_info()?;

    if args.check {
        print_text(&config.to_toml()?)?;
        print_text(&format!(
            "# compiler: {} ({})",
            compiler.path.display(),
            compiler.source
        ))?;
        return Ok(());
    }

    tracing::info!(
        compiler = %compiler.path.display(),
        source = %compiler.source,
        "compiler resolved"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        let db = connect_database(&config).await?;
        let state = AppState::new(config, db, compiler)?;
        docgen_server::serve(state).await?;
        Ok::<(), anyhow::Error>(())
    })
}

/// Build the database tier. An unreachable database at startup is logged,
/// not fatal: lookups report it as unavailable until it comes back.
async fn connect_database(config: &DocgenConfig) -> Result<Option<Arc<dyn ArtifactDb>>> {
    let Some(db) = PgArtifactDb::from_config(&config.database)? else {
        tracing::info!("no database configured, registry is disk only");
        return Ok(None);
    };

    match db.migrate().await {
        Ok(()) => tracing::info!("database ready"),
        Err(e) => tracing::warn!(error = %e, "database not reachable at startup"),
    }
    let db: Arc<dyn ArtifactDb> = Arc::new(db);
    Ok(Some(db))
}
