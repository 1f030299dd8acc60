//! Application State - Stato condiviso dell'applicazione
//!
//! Contiene gli store, l'autorità che firma i token e nient'altro:
//! nessuno stato mutabile condiviso tra richieste.

use crate::core::TokenAuthority;
use crate::repositories::{AuditRepository, AuditStore, UserRepository, UserStore};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store degli utenti (login, registrazione)
    pub users: Arc<dyn UserStore>,

    /// Store append-only degli audit log
    pub audit: Arc<dyn AuditStore>,

    /// Firma e verifica dei token di sessione
    pub tokens: TokenAuthority,
}

impl AppState {
    /// Crea lo stato con i repository MySQL sul pool fornito.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `jwt_secret` - Chiave segreta per la firma dei token
    pub fn new(pool: MySqlPool, jwt_secret: &str) -> Self {
        Self::with_stores(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(AuditRepository::new(pool)),
            TokenAuthority::new(jwt_secret),
        )
    }

    /// Crea lo stato con store arbitrari (es. in memoria nei test)
    pub fn with_stores(
        users: Arc<dyn UserStore>,
        audit: Arc<dyn AuditStore>,
        tokens: TokenAuthority,
    ) -> Self {
        Self {
            users,
            audit,
            tokens,
        }
    }
}
