//! DTOs de entrada y salida del motor

pub mod accommodation_dto;
pub mod account_dto;
pub mod common;
pub mod ledger_dto;
pub mod logistics_dto;
pub mod participant_dto;
pub mod route_dto;
pub mod segment_dto;

pub use common::ApiResponse;
