//! Rutas HTTP
//!
//! Handlers finos: extraen el JSON y delegan en los controladores.

pub mod accommodation_routes;
pub mod account_routes;
pub mod ledger_routes;
pub mod logistics_routes;
pub mod participant_routes;
pub mod route_routes;
pub mod segment_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Router de la API bajo `/api`, más `/health`
pub fn create_api_router() -> Router<AppState> {
    let api = Router::new()
        .merge(route_routes::create_route_router())
        .merge(segment_routes::create_segment_router())
        .merge(logistics_routes::create_logistics_router())
        .merge(participant_routes::create_participant_router())
        .merge(accommodation_routes::create_accommodation_router())
        .merge(ledger_routes::create_ledger_router())
        .merge(account_routes::create_account_router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
