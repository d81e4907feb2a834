use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{BoxError, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::presentation::grpc::service::GrpcPostModerationService;
use crate::presentation::http::build_router;
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::trace::apply_trace;

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;

    let listener = TcpListener::bind(&settings.http_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", settings.http_addr))?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub(crate) async fn run_grpc(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = settings
        .grpc_addr
        .parse()
        .with_context(|| format!("invalid GRPC_ADDR: {}", settings.grpc_addr))?;

    let service = GrpcPostModerationService::new(state)
        .into_server()
        .max_decoding_message_size(settings.grpc_max_decoding_message_size_bytes)
        .max_encoding_message_size(settings.grpc_max_encoding_message_size_bytes);

    info!("gRPC server listening on {addr}");
    tonic::transport::Server::builder()
        .concurrency_limit_per_connection(settings.grpc_concurrency_limit)
        .timeout(Duration::from_secs(settings.grpc_request_timeout_secs))
        .add_service(service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;
    Ok(())
}

fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_limit_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    settings.http_request_timeout_secs,
                )))
                .layer(ConcurrencyLimitLayer::new(settings.http_concurrency_limit)),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

async fn handle_limit_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<Elapsed>() {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "request timed out" })),
        );
    }
    warn!(error = %err, "unhandled middleware error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
