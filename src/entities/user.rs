//! User entity - Entità utente

use super::enums::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    // hash bcrypt, mai esposto dai DTO
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
