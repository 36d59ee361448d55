//! Motor de itinerarios de rutas turísticas
//!
//! Rutas por días con segmentos, logística, participantes, alojamiento,
//! cuentas y un libro de transacciones inmutable. Los campos agregados de
//! la ruta se recalculan dentro de la misma transacción que los modifica.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware_with_origins;
use crate::state::AppState;

/// Router completo con trazas y CORS
pub fn build_app(state: AppState) -> Router {
    let cors = cors_middleware_with_origins(&state.config.cors_origins);
    routes::create_api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
