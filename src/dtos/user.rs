//! User DTOs - Data Transfer Objects per utenti e autenticazione

use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

// struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            email: value.email,
            role: value.role, // la password non viene mai esposta al client
        }
    }
}

/// Body di POST /auth/register
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct RegisterDTO {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Body di POST /auth/login
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// DTO per creare un nuovo utente (password già hashata)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDTO {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Risposta di registrazione: l'`id` in cima è quello usato dall'audit log
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponseDTO {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDTO {
    pub token: String,
    pub user: UserDTO,
}
