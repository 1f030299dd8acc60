//! Admin services - Operazioni amministrative fuori dalla pipeline HTTP

use crate::entities::User;
use crate::repositories::UserStore;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("new password must not be empty")]
    EmptyPassword,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Sovrascrive la password dell'utente con l'email indicata.
///
/// # Returns
/// * `Ok(User)` - Utente aggiornato (con il nuovo hash)
/// * `Err(ResetError::UserNotFound)` - Nessun utente con quell'email
#[instrument(skip(users, new_password))]
pub async fn reset_password(
    users: &dyn UserStore,
    email: &str,
    new_password: &str,
) -> Result<User, ResetError> {
    if new_password.is_empty() {
        return Err(ResetError::EmptyPassword);
    }

    let Some(mut user) = users.find_by_email(email).await? else {
        warn!("No user with this email");
        return Err(ResetError::UserNotFound(email.to_string()));
    };

    let password_hash = User::hash_password(new_password)?;
    users.update_password(user.user_id, &password_hash).await?;
    user.password = password_hash;

    info!("Password reset for user {}", user.user_id);
    Ok(user)
}
