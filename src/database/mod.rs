//! Módulo de base de datos
//!
//! Maneja las migraciones y las transacciones de comando con PostgreSQL

pub mod connection;

pub use connection::{begin_command, mask_database_url, run_migrations};
