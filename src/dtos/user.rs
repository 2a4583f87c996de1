//! User DTOs - Data Transfer Objects per utenti

use crate::entities::{Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        // la password non viene mai esposta al client
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

/// Body di `POST /auth/register`
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct RegisterUserDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: Option<Role>,
}

/// DTO per creare un nuovo utente (senza id, password già hashata)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// DTO per il login
#[derive(Deserialize, Debug)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// Risposta del login
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenDTO {
    pub access_token: String,
    pub token_type: String,
    /// Durata del token in secondi
    pub expires_in: i64,
    pub user: UserDTO,
}
