//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Le query usano l'API runtime di sqlx (`sqlx::query`, `query_as::<_, T>`) con
//! `FromRow`, così il crate compila senza un database raggiungibile a build time.
//! Lo schema di riferimento è in `schema.sql`.

use crate::core::Config;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

pub mod audit_log;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{AuditStore, UserStore};

pub use audit_log::{AuditRepository, MemoryAuditStore};
pub use user::{MemoryUserStore, UserRepository};

/// Crea il pool di connessioni MySQL condiviso dai repository
pub async fn create_pool(config: &Config) -> Result<MySqlPool, sqlx::Error> {
    create_pool_with(&config.database_url, config.max_connections).await
}

pub async fn create_pool_with(
    database_url: &str,
    max_connections: u32,
) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Database pool created (max {} connections)", max_connections);
    Ok(pool)
}
