use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use docgen_core::CacheStats;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    /// No database tier configured
    Disabled,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: DatabaseHealth,
    pub template_cache: CacheStats,
    pub resource_cache: CacheStats,
    pub compiler: String,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /health`, 503 while the configured database is unreachable
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.resolver().database() {
        None => DatabaseHealth {
            status: HealthStatus::Disabled,
            latency_ms: None,
            error: None,
        },
        Some(db) => {
            let start = Instant::now();
            match db.ping().await {
                Ok(()) => DatabaseHealth {
                    status: HealthStatus::Healthy,
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                    error: None,
                },
                Err(e) => DatabaseHealth {
                    status: HealthStatus::Unhealthy,
                    latency_ms: None,
                    error: Some(e.to_string()),
                },
            }
        }
    };

    let (code, status) = if database.status == HealthStatus::Unhealthy {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy)
    } else {
        (StatusCode::OK, HealthStatus::Healthy)
    };

    let response = HealthResponse {
        status,
        database,
        template_cache: state.resolver().template_cache().stats(),
        resource_cache: state.resolver().resource_cache().stats(),
        compiler: state.compiler().path.display().to_string(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    };
    (code, Json(response))
}
