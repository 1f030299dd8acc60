//! Server library - espone i moduli principali per i binari e i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, audit, auth, config, token};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes di autenticazione (register, login, me)
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{AuditRecorder, audit_middleware, authentication_middleware};
    use services::*;

    // Registrazione: pubblica ma auditata, user_id registrato come null
    let register_audit = AuditRecorder::new(state.audit.clone(), "register", "user");

    let public_routes = Router::new()
        .route(
            "/register",
            post(register_user).layer(middleware::from_fn_with_state(
                register_audit,
                audit_middleware,
            )),
        )
        .route("/login", post(login_user));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}
