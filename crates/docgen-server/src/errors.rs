use crate::pipeline::{Failed, Stage};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docgen_core::DocgenError;
use serde::Serialize;
use serde_json::{Value, json};

// Codes produced by the HTTP layer itself
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";

/// JSON error body: `{"code", "message", "stage", "details"}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            stage: None,
            details: None,
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn request_timeout(secs: u64) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            REQUEST_TIMEOUT,
            format!("request did not complete within {}s", secs),
        )
    }
}

pub fn status_for(error: &DocgenError) -> StatusCode {
    match error {
        DocgenError::MalformedInput(_) | DocgenError::Configuration(_) => StatusCode::BAD_REQUEST,
        DocgenError::MissingKey { .. }
        | DocgenError::MalformedTemplate { .. }
        | DocgenError::CompilationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DocgenError::NotFound { .. } => StatusCode::NOT_FOUND,
        DocgenError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DocgenError::CompilationTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        DocgenError::CompilerNotFound(_)
        | DocgenError::ConfigParseError(_)
        | DocgenError::IoError(_)
        | DocgenError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn details_for(error: &DocgenError) -> Option<Value> {
    match error {
        DocgenError::NotFound { identifier, class } => Some(json!({
            "identifier": identifier,
            "class": class,
        })),
        DocgenError::MissingKey { key, line } => Some(json!({ "key": key, "line": line })),
        DocgenError::MalformedTemplate { line, .. } => Some(json!({ "line": line })),
        DocgenError::CompilationFailed {
            exit_code,
            diagnostics,
            ..
        } => Some(json!({
            "exitCode": exit_code,
            "diagnostics": diagnostics,
        })),
        DocgenError::CompilationTimeout { timeout } => Some(json!({
            "timeoutSecs": timeout.as_secs_f64(),
        })),
        _ => None,
    }
}

impl From<DocgenError> for ApiError {
    fn from(error: DocgenError) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!(code = error.code(), error = %error, "request failed");
        }
        Self {
            status,
            code: error.code(),
            message: error.to_string(),
            stage: None,
            details: details_for(&error),
        }
    }
}

impl From<Failed> for ApiError {
    fn from(failed: Failed) -> Self {
        ApiError::from(failed.error).with_stage(failed.stage)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
