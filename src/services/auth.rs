//! Auth services - Registrazione, login e identità corrente

use crate::core::{AppError, AppState, Principal};
use crate::dtos::{
    CreateUserDTO, LoginDTO, LoginResponseDTO, RegisterDTO, RegisterResponseDTO, UserDTO,
};
use crate::entities::{DEFAULT_ROLE, User};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterDTO>,
) -> Result<(StatusCode, Json<RegisterResponseDTO>), AppError> {
    debug!("Registering new user");
    body.validate()?;

    if state.users.find_by_email(&body.email).await?.is_some() {
        warn!("Email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let created = state
        .users
        .create(&CreateUserDTO {
            email: body.email,
            password: password_hash,
            role: DEFAULT_ROLE.to_string(),
        })
        .await?;

    let token = state
        .tokens
        .issue(&created.user_id.to_string(), &created.role)?;

    info!("User {} registered", created.user_id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponseDTO {
            id: created.user_id,
            email: created.email,
            role: created.role,
            token,
        }),
    ))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<Json<LoginResponseDTO>, AppError> {
    debug!("Login attempt");
    // stesso messaggio per email sconosciuta e password errata
    let user = match state.users.find_by_email(&body.email).await? {
        Some(user) if user.verify_password(&body.password) => user,
        _ => {
            warn!("Invalid credentials");
            return Err(AppError::unauthorized("Invalid email or password"));
        }
    };

    let token = state.tokens.issue(&user.user_id.to_string(), &user.role)?;

    info!("User {} logged in", user.user_id);
    Ok(Json(LoginResponseDTO {
        token,
        user: UserDTO::from(user),
    }))
}

/// Ritorna il principal verificato dal middleware di autenticazione
#[debug_handler]
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}
