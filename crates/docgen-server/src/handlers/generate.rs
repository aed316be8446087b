use crate::errors::ApiError;
use crate::pipeline::{self, Generated};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Number of compiler passes the document took
pub const PASSES_HEADER: &str = "x-docgen-passes";

/// `GET /generate` and `POST /generate`
///
/// The whole pipeline runs under the request deadline. When the deadline
/// fires the pipeline future is dropped, which removes the workspace and
/// kills a running compiler.
pub async fn generate(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = state.next_request_id();
    let span = tracing::info_span!("generate", request_id);
    let deadline_secs = state.config().server.request_timeout_secs;
    let started = Instant::now();

    let outcome = tokio::time::timeout(
        Duration::from_secs(deadline_secs),
        pipeline::generate(&state, &body, query.as_deref()),
    )
    .instrument(span.clone())
    .await;

    span.in_scope(|| match outcome {
        Err(_) => {
            tracing::warn!(deadline_secs, "request deadline exceeded");
            Err(ApiError::request_timeout(deadline_secs))
        }
        Ok(Err(failed)) => {
            tracing::warn!(
                stage = %failed.stage,
                code = failed.error.code(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "generation failed"
            );
            Err(failed.into())
        }
        Ok(Ok(generated)) => {
            tracing::info!(
                bytes = generated.document.len(),
                passes = generated.passes,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "document generated"
            );
            Ok(document_response(&state, generated))
        }
    })
}

fn document_response(state: &AppState, generated: Generated) -> Response {
    let config = state.config();
    let content_type = content_type_for(&config.compiler.output_extension);
    let disposition = format!("inline; filename=\"{}\"", config.output_file_name());

    let mut response = (StatusCode::OK, generated.document).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(PASSES_HEADER, HeaderValue::from(generated.passes));
    response
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "dvi" => "application/x-dvi",
        "ps" => "application/postscript",
        "html" => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
