pub mod cors;

pub use cors::cors_middleware_with_origins;
