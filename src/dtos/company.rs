//! Company DTOs - Data Transfer Objects per i profili aziendali

use crate::entities::Company;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompanyDTO {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyDTO {
    fn from(value: Company) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            description: value.description,
            website: value.website,
            created_at: value.created_at,
        }
    }
}

/// DTO per aggiornare un profilo (solo i campi `Some(_)` vengono modificati)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateCompanyDTO {
    #[validate(length(min = 1, max = 200, message = "Company name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
}
