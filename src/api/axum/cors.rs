//! CORS layers for browser clients.

use axum::http::{Method, header};
use tower_http::cors::CorsLayer;

/// Allows every origin, method and header. Development only; it cannot be
/// combined with the session cookie in a browser.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// Allows the listed origins with credentials, so the session cookie is sent
/// along with cross-origin requests.
pub fn default(allowed_origins: &[&str]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
