//! Application entity - Candidatura di uno studente a un'offerta

use super::enums::ApplicationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub id: i32,
    pub student_id: i32,
    pub offer_id: i32,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}
