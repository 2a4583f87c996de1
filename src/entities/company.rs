//! Company entity - Profilo aziendale collegato 1:1 a un utente COMPANY

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Company {
    pub id: i32,
    pub user_id: i32, // proprietario del profilo, univoco
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}
