//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y del motor de comandos.

use anyhow::{Context, Result};
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// `lock_timeout` aplicado a cada transacción de comando
    pub lock_timeout_ms: u64,
    /// Intentos por comando ante conflictos de concurrencia
    pub command_retries: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            lock_timeout_ms: 5000,
            command_retries: 3,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

/// Lista separada por comas; vacía si no hay valores
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EnvironmentConfig {
    /// Leer configuración del entorno, con valores por defecto para desarrollo
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or(defaults.cors_origins),
            lock_timeout_ms: parse_var("LOCK_TIMEOUT_MS", defaults.lock_timeout_ms)?,
            command_retries: parse_var("COMMAND_RETRIES", defaults.command_retries)?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.command_retries, 3);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://app.example.com ,"),
            vec!["http://localhost:5173".to_string(), "https://app.example.com".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        std::env::set_var("TOUR_TEST_LOCK_TIMEOUT", "abc");
        assert!(parse_var::<u64>("TOUR_TEST_LOCK_TIMEOUT", 10).is_err());
        std::env::set_var("TOUR_TEST_LOCK_TIMEOUT", " 250 ");
        assert_eq!(parse_var::<u64>("TOUR_TEST_LOCK_TIMEOUT", 10).unwrap(), 250);
        std::env::remove_var("TOUR_TEST_LOCK_TIMEOUT");
        assert_eq!(parse_var::<u64>("TOUR_TEST_LOCK_TIMEOUT", 10).unwrap(), 10);
    }
}
