//! Offer entity - Offerta di tirocinio pubblicata da un'azienda

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Offer {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration: String,
    pub location: String,
    pub price: String, // rimborso spese, testo libero
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}
