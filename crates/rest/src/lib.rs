//! # calc-rest - Labor Rates HTTP API
//!
//! HTTP layer for the CALC labor rates service: a search-and-filter API
//! over awarded government labor-rate contracts. Requests are compiled into
//! a deferred query description executed by a [`calc_store::RateStore`]
//! backend; statistics always cover the entire filtered set regardless of
//! the requested page.
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/rates/` | GET | Filtered, paginated rate listing with price statistics |
//! | `/api/rates/csv/` | GET | Same filters, full result set as a CSV attachment |
//! | `/api/search/` | GET | Labor category autocomplete |
//! | `/health` | GET | Store connectivity check |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use calc_rest::{ServerConfig, create_app};
//! use calc_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteStore::in_memory()?;
//!     store.init_schema()?;
//!
//!     let app = create_app(store);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All errors are returned as a JSON body of the shape
//! `{ "error": { "code", "message" } }`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid | Malformed numeric parameter, unknown sort field or education code |
//! | 500 | internal | Store or serialization failure |
//! | 503 | unavailable | Store unreachable (health check) |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and JSON error bodies
//! - [`config`] - Server configuration
//! - [`state`] - Application state (store handle, configuration)
//! - [`extractors`] - Parameter bag, pagination, token parsing, and the
//!   filter compiler
//! - [`handlers`] - HTTP request handlers
//! - [`responses`] - Paginated JSON and CSV presenters
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use calc_store::RateStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(store: S) -> Router
where
    S: RateStore + 'static,
{
    create_app_with_config(store, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up all routes, the trace and timeout layers, and (when enabled)
/// CORS.
pub fn create_app_with_config<S>(store: S, config: ServerConfig) -> Router
where
    S: RateStore + 'static,
{
    info!(
        "creating rates API server with backend: {}",
        store.backend_name()
    );

    let state = AppState::new(Arc::new(store), config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at application startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("calc_rest={},calc_store={},tower_http=debug", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
