//! Estado compartido de la aplicación
//!
//! Se pasa a los handlers a través del router de Axum.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::controllers::CommandContext;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub commands: CommandContext,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let commands = CommandContext::new(pool.clone(), &config);
        Self {
            pool,
            config,
            commands,
        }
    }
}
