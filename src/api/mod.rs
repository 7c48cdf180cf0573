//! HTTP layer: request and response DTOs plus the axum routes.

mod types;

pub use types::*;

pub mod axum;
