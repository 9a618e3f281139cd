//! HTTP route handlers for the bridge server.

pub mod deploy;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
