//! Services module
//!
//! Lógica del motor de itinerarios: validación de invariantes, recálculo
//! de agregados, libro de transacciones y reintentos de comandos.

pub mod aggregate_engine;
pub mod invariant_validator;
pub mod ledger_service;
pub mod retry;

pub use invariant_validator::{Rule, Violation};
