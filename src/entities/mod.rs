//! Entities module - Entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella nel database (vedi `schema.sql`).

pub mod audit_log;
pub mod user;

// Re-exports per facilitare l'import
pub use audit_log::{AuditRecord, NewAuditRecord};
pub use user::{DEFAULT_ROLE, User};
