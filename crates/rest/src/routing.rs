//! Route configuration.

use axum::{Router, routing::get};
use calc_store::RateStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes for the rates API.
///
/// # Routes
///
/// - `GET /api/rates/` - Filtered, paginated rate listing with statistics
/// - `GET /api/rates/csv/` - Filtered result set as a CSV attachment
/// - `GET /api/search/` - Labor category autocomplete
/// - `GET /health` - Health check
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RateStore + 'static,
{
    Router::new()
        .route("/api/rates/", get(handlers::rates_handler::<S>))
        .route("/api/rates/csv/", get(handlers::export_csv_handler::<S>))
        .route("/api/search/", get(handlers::autocomplete_handler::<S>))
        .route("/health", get(handlers::health_handler::<S>))
        .with_state(state)
}
