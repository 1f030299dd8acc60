//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Emissione e verifica dei token di sessione
//! - Middleware di autenticazione
//! - Audit delle azioni che modificano lo stato
//! - Configurazione, logging, gestione errori, stato applicazione

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod token;

// Re-exports per facilitare l'import
pub use audit::{AuditRecorder, RequestSnapshot, audit_middleware, resolve_resource_id};
pub use auth::{Principal, authentication_middleware, extract_token};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use token::{Claims, TOKEN_VALIDITY_DAYS, TokenAuthority, TokenError};
