//! Public-facing web server.
//!
//! Keeps the hosting platform's health checks happy and serves the barcode
//! scanner page that the Telegram client opens as a Mini App.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Scanner page, embedded so the binary is self-contained.
pub const SCANNER_HTML: &str = include_str!("../../webapp/scanner.html");

/// Build the router (separate from `start_web_server` so tests can drive it).
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/scanner", get(scanner_handler))
}

/// Start the public web server.
pub async fn start_web_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = create_router();

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /          - Status line");
    log::info!("  /health    - Health check");
    log::info!("  /scanner   - Barcode scanner Mini App");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /: human-readable status line.
async fn home_handler() -> impl IntoResponse {
    (StatusCode::OK, "Planogram bot is running ✅")
}

/// GET /health: simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// GET /scanner: the Mini App page.
async fn scanner_handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Html(SCANNER_HTML),
    )
}
