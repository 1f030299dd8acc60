//! Store traits
//!
//! Interfaces the request pipeline and the admin tooling consume. Each one has a
//! MySQL implementation and an in-memory one.

use crate::dtos::CreateUserDTO;
use crate::entities::{AuditRecord, NewAuditRecord, User};
use async_trait::async_trait;

/// Append-only store for audit records
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends a record to the store
    ///
    /// # Arguments
    /// * `record` - Record to append (without ID and creation time)
    ///
    /// # Returns
    /// * `Ok(AuditRecord)` - Stored record with ID and `created_at` assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, sqlx::Error>;
}

/// Store for user credentials
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by exact email match
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    /// * `Err(sqlx::Error)` - Error during reading
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    /// Creates a new user. `data.password` must already be hashed.
    ///
    /// # Returns
    /// * `Ok(User)` - Created user with ID assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn create(&self, data: &CreateUserDTO) -> Result<User, sqlx::Error>;

    /// Overwrites the stored password hash of a user
    ///
    /// # Returns
    /// * `Ok(())` - Update successful
    /// * `Err(sqlx::Error::RowNotFound)` - No user with that ID
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), sqlx::Error>;
}
