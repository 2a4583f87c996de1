//! Offer DTOs - Data Transfer Objects per le offerte

use crate::entities::Offer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OfferDTO {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration: String,
    pub location: String,
    pub price: String,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Offer> for OfferDTO {
    fn from(value: Offer) -> Self {
        Self {
            id: value.id,
            company_id: value.company_id,
            title: value.title,
            description: value.description,
            category: value.category,
            duration: value.duration,
            location: value.location,
            price: value.price,
            features: value.features,
            created_at: value.created_at,
        }
    }
}

/// Body di `POST /offers`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct OfferBodyDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "Description must be between 1 and 10000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub duration: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 100))]
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// DTO per creare una nuova offerta (company_id ricavato dal principal)
#[derive(Debug, Clone)]
pub struct CreateOfferDTO {
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration: String,
    pub location: String,
    pub price: String,
    pub features: Vec<String>,
}

impl CreateOfferDTO {
    pub fn new(company_id: i32, body: OfferBodyDTO) -> Self {
        Self {
            company_id,
            title: body.title,
            description: body.description,
            category: body.category,
            duration: body.duration,
            location: body.location,
            price: body.price,
            features: body.features,
        }
    }
}

/// DTO per aggiornare un'offerta (aggiornamento parziale)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateOfferDTO {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub duration: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub price: Option<String>,
    pub features: Option<Vec<String>>,
}
