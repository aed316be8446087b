use crate::errors::ApiError;
use crate::request::RegisterQuery;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use docgen_core::registry::{self, RegisteredIn};
use docgen_core::{ArtifactClass, DocgenError};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub class: ArtifactClass,
    pub stored_in: &'static str,
}

/// `PUT /register/:class/:name`
///
/// The body is the raw artifact. Templates take `left`/`right` query
/// parameters naming the delimiters they are written for.
pub async fn register(
    State(state): State<AppState>,
    Path((class, name)): Path<(String, String)>,
    query: Result<Query<RegisterQuery>, QueryRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Query(query) = query.map_err(|e| DocgenError::MalformedInput(e.body_text()))?;
    let class: ArtifactClass = class.parse()?;

    let delimiters = query.delimiters();
    if class == ArtifactClass::Template {
        delimiters.validate().map_err(DocgenError::from)?;
    }

    let (id, target) =
        registry::register(state.resolver(), class, &name, &delimiters, body.to_vec()).await?;

    let stored_in = match target {
        RegisteredIn::Disk => "disk",
        RegisteredIn::Database => "database",
    };
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id,
            class,
            stored_in,
        }),
    ))
}
