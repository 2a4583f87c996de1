//! Application DTOs - Data Transfer Objects per le candidature

use crate::dtos::{OfferDTO, UserDTO};
use crate::entities::{Application, ApplicationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplicationDTO {
    pub id: i32,
    pub student_id: i32,
    pub offer_id: i32,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl From<Application> for ApplicationDTO {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            student_id: value.student_id,
            offer_id: value.offer_id,
            status: value.status,
            applied_at: value.applied_at,
        }
    }
}

/// Body di `POST /applications`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApplyDTO {
    pub offer_id: i32,
}

/// DTO per creare una candidatura; lo stato iniziale è sempre Pending
#[derive(Debug, Clone)]
pub struct CreateApplicationDTO {
    pub student_id: i32,
    pub offer_id: i32,
}

/// Body di `PATCH /applications/{application_id}`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateApplicationDTO {
    pub status: ApplicationStatus,
}

/// DTO arricchito con l'offerta e lo studente
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnrichedApplicationDTO {
    pub id: i32,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub offer: Option<OfferDTO>,
    pub student: Option<UserDTO>,
}
