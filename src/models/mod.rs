//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod account;
pub mod accommodation;
pub mod logistics;
pub mod participant;
pub mod route;
pub mod segment;
pub mod transaction;

pub use account::*;
pub use accommodation::*;
pub use logistics::*;
pub use participant::*;
pub use route::*;
pub use segment::*;
pub use transaction::*;
