//! axum routes, handlers and extractors.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use orgbook::api::axum::{AppState, routes};
//!
//! let app = routes().with_state(AppState {
//!     user_repository,
//!     organization_repository,
//!     membership_repository,
//!     contact_repository,
//!     session_repository,
//!     avatar_storage,
//!     config: Arc::new(config),
//! });
//! ```

mod cors;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use cors::{default as default_cors, permissive as permissive_cors};
pub use error::AppError;
pub use middleware::{ActiveOrganization, SessionUser};
pub use routes::{
    AppState, contact_routes, member_routes, organization_routes, public_routes, routes,
    user_routes,
};
