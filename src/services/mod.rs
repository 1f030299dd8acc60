//! Services module - Handler HTTP e operazioni amministrative

pub mod admin;
pub mod auth;

// Re-exports per facilitare l'import
pub use admin::{ResetError, reset_password};
pub use auth::{login_user, me, register_user};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
