//! Superficie de comandos
//!
//! Cada comando abre su propia transacción, bloquea la fila de la ruta
//! afectada y sigue el protocolo validar → mutar → recalcular antes del commit.
//! Las lecturas usan una conexión del pool sin transacción.

pub mod accommodation_controller;
pub mod account_controller;
pub mod ledger_controller;
pub mod logistics_controller;
pub mod participant_controller;
pub mod route_controller;
pub mod segment_controller;

use std::future::Future;

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::database::begin_command;
use crate::models::Route;
use crate::repositories::RouteRepository;
use crate::services::retry::with_retries;
use crate::utils::errors::{not_found_error, AppResult};

pub use accommodation_controller::AccommodationController;
pub use account_controller::AccountController;
pub use ledger_controller::LedgerController;
pub use logistics_controller::LogisticsController;
pub use participant_controller::ParticipantController;
pub use route_controller::RouteController;
pub use segment_controller::SegmentController;

/// Lo que necesita cada comando: pool, lock_timeout y número de intentos
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub pool: PgPool,
    pub lock_timeout_ms: u64,
    pub retries: u32,
}

impl CommandContext {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            pool,
            lock_timeout_ms: config.lock_timeout_ms,
            retries: config.command_retries,
        }
    }

    /// Transacción de comando con `lock_timeout` local
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        begin_command(&self.pool, self.lock_timeout_ms).await
    }

    /// Conexión para lecturas puras
    pub async fn read(&self) -> AppResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }

    /// Ejecuta el comando completo, repitiéndolo ante conflictos de concurrencia
    pub async fn run<T, F, Fut>(&self, operation: &str, command: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        with_retries(operation, self.retries, command).await
    }
}

/// `SELECT ... FOR UPDATE` sobre la ruta; primer paso de todo comando con alcance de ruta
pub(crate) async fn lock_route(conn: &mut PgConnection, route_id: Uuid) -> AppResult<Route> {
    RouteRepository::lock(conn, route_id)
        .await?
        .ok_or_else(|| not_found_error("Route", &route_id))
}
