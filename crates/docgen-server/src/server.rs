use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use docgen_core::{DocgenError, Result};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_body = state.config().server.max_body_bytes;

    Router::new()
        .route(
            "/generate",
            get(handlers::generate).post(handlers::generate),
        )
        .route("/register/:class/:name", put(handlers::register))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `[server].bind` and serve until Ctrl-C
pub async fn serve(state: AppState) -> Result<()> {
    let bind = state.config().server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| DocgenError::Configuration(format!("cannot bind {}: {}", bind, e)))?;

    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "docgen listening");

    let app = router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.log_cache_stats();
    tracing::info!("docgen stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
