//! Copilot Proxy Server - Main entry point
//!
//! This binary creates and runs the HTTP server with all configured routes
//! and middleware. Configuration is loaded from a JSON file at startup.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Local;
use copilot_proxy_rust::{
    api::{chat_completions, health, list_models, metrics_handler, AppState},
    core::{init_metrics, AppConfig},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Custom time formatter that uses local timezone (respects TZ environment variable)
struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    init_logging();
    init_metrics();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.json".to_string());
    let config = AppConfig::load(&config_path)?;

    let http_client = create_http_client(&config);
    let state = Arc::new(AppState::new(config.clone(), http_client));

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting Copilot API Proxy on {}", addr);
    tracing::info!("OpenAI-compatible API: /chat/completions, /models");
    tracing::info!("Metrics endpoint: /metrics");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging with local timezone and HTTP library noise suppression.
fn init_logging() {
    // Check if NO_COLOR environment variable is set (for file logging without ANSI codes)
    let no_color = std::env::var("NO_COLOR").is_ok();

    // Default filter: info level for most crates, debug for copilot_proxy_rust.
    // Noise-suppression filters for hyper/h2/reqwest are always appended so a
    // bare RUST_LOG=trace does not let verbose transport logs through.
    let base_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,copilot_proxy_rust=debug".to_string());
    let filter_str = format!(
        "{},hyper=warn,hyper::proto=warn,h2=warn,reqwest=warn",
        base_filter
    );
    let filter = tracing_subscriber::EnvFilter::new(filter_str);

    if no_color {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_timer(LocalTime))
            .init();
    }
}

/// Build router with all endpoints.
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/models", get(list_models))
        .route("/chat/completions", post(chat_completions))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create HTTP client with connection pooling for upstream completion calls.
fn create_http_client(config: &AppConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()
        .expect("Failed to build HTTP client")
}
