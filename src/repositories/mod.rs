//! Repositorios
//!
//! Acceso SQL por tabla. Todas las funciones reciben la conexión de la
//! transacción del comando para que validación, escritura y recálculo
//! compartan el mismo snapshot.

pub mod accommodation_repository;
pub mod account_repository;
pub mod logistics_repository;
pub mod participant_repository;
pub mod route_repository;
pub mod segment_repository;
pub mod transaction_repository;

pub use accommodation_repository::AccommodationRepository;
pub use account_repository::{AccountRepository, NewAccount};
pub use logistics_repository::LogisticsRepository;
pub use participant_repository::ParticipantRepository;
pub use route_repository::RouteRepository;
pub use segment_repository::SegmentRepository;
pub use transaction_repository::{LedgerFilter, NewTransaction, TransactionRepository};
