//! Per-request generation pipeline
//!
//! A request moves strictly forward through [`Stage`]s. Any error ends the
//! request in a failed state tagged with the stage it happened in. Once a
//! workspace exists it is released before the outcome is returned.

use crate::request::{GenerateBody, GenerateQuery};
use crate::state::AppState;
use docgen_core::artifact::{ArtifactClass, Provenance};
use docgen_core::template::TemplateEngine;
use docgen_core::{DocgenError, Workspace};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ParsingRequest,
    ResolvingTemplate,
    ResolvingDetails,
    ResolvingResources,
    Rendering,
    PreparingWorkspace,
    Compiling,
    Responding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ParsingRequest => "parsing_request",
            Stage::ResolvingTemplate => "resolving_template",
            Stage::ResolvingDetails => "resolving_details",
            Stage::ResolvingResources => "resolving_resources",
            Stage::Rendering => "rendering",
            Stage::PreparingWorkspace => "preparing_workspace",
            Stage::Compiling => "compiling",
            Stage::Responding => "responding",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a request
#[derive(Debug)]
pub struct Failed {
    pub stage: Stage,
    pub error: DocgenError,
}

impl fmt::Display for Failed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for Failed {}

/// Attach a stage to a fallible step
trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, Failed>;
}

impl<T, E: Into<DocgenError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, Failed> {
        self.map_err(|e| Failed {
            stage,
            error: e.into(),
        })
    }
}

/// Successful outcome
#[derive(Debug)]
pub struct Generated {
    pub document: Vec<u8>,
    pub passes: u32,
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "stage");
}

/// Run one generation request end to end
pub async fn generate(
    state: &AppState,
    body: &[u8],
    query: Option<&str>,
) -> Result<Generated, Failed> {
    enter(Stage::ParsingRequest);
    let body = GenerateBody::from_bytes(body).at(Stage::ParsingRequest)?;
    let query = GenerateQuery::parse(query).at(Stage::ParsingRequest)?;
    let delimiters = body.delimiters();
    let engine = TemplateEngine::new(delimiters.clone(), body.policy().at(Stage::ParsingRequest)?)
        .at(Stage::ParsingRequest)?;

    let GenerateBody {
        template,
        details,
        resources,
        ..
    } = body;
    let template = Provenance::select(template, query.template, ArtifactClass::Template)
        .at(Stage::ParsingRequest)?;
    let details = Provenance::select(details, query.details, ArtifactClass::Details)
        .at(Stage::ParsingRequest)?;

    // The three lookups run concurrently; failures are reported in stage
    // order regardless of which lookup finished first
    let resolver = state.resolver();
    enter(Stage::ResolvingTemplate);
    let (template, details, resources) = tokio::join!(
        resolver.resolve_template(template, &delimiters),
        resolver.resolve_details(details),
        resolver.resolve_resources(resources, &query.resources),
    );
    let template = template.at(Stage::ResolvingTemplate)?;
    let details = details.at(Stage::ResolvingDetails)?;
    let resources = resources.at(Stage::ResolvingResources)?;

    enter(Stage::Rendering);
    let rendered = engine.render(&template, &details).at(Stage::Rendering)?;

    enter(Stage::PreparingWorkspace);
    let workspace = state.workspaces().acquire().await.at(Stage::PreparingWorkspace)?;

    let outcome = compile_in(state, &workspace, &rendered, &resources).await;

    if let Err(e) = workspace.release().await {
        tracing::warn!(error = %e, "workspace release failed");
    }

    let compiled = outcome?;
    enter(Stage::Responding);
    Ok(Generated {
        document: compiled.output,
        passes: compiled.passes,
    })
}

async fn compile_in(
    state: &AppState,
    workspace: &Workspace,
    rendered: &[u8],
    resources: &docgen_core::ResourceMap,
) -> Result<docgen_compiler::Compiled, Failed> {
    let config = state.config();
    let source_file = config.source_file_name();

    for (name, bytes) in resources {
        workspace
            .write_resource(name, bytes)
            .await
            .at(Stage::PreparingWorkspace)?;
    }
    workspace
        .write_rendered(&source_file, rendered)
        .await
        .at(Stage::PreparingWorkspace)?;

    enter(Stage::Compiling);
    docgen_compiler::compile(
        workspace,
        &source_file,
        &config.output_file_name(),
        state.exec_options(),
    )
    .await
    .at(Stage::Compiling)
}
