//! Render command - substitute details into a template offline

use crate::cli::RenderArgs;
use crate::output::write_bytes;
use anyhow::{Context, Result};
use docgen_core::template::{Delimiters, MissingKeyPolicy, TemplateEngine};
use docgen_core::{Details, DocgenError};

pub fn run(args: RenderArgs) -> Result<()> {
    let template = std::fs::read(&args.template)
        .with_context(|| format!("failed to read template {}", args.template.display()))?;
    let details = std::fs::read(&args.details)
        .with_context(|| format!("failed to read details {}", args.details.display()))?;
    let details = Details::from_slice(&details)?;

    let policy = args
        .on_missing_key
        .parse::<MissingKeyPolicy>()
        .map_err(DocgenError::from)?;
    let engine = TemplateEngine::new(Delimiters::new(&args.left, &args.right), policy)
        .map_err(DocgenError::from)?;
    let rendered = engine.render(&template, &details).map_err(DocgenError::from)?;

    write_bytes(args.output.as_deref(), &rendered)?;
    if let Some(path) = &args.output {
        tracing::info!(path = %path.display(), bytes = rendered.len(), "rendered");
    }
    Ok(())
}
