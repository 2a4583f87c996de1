//! Query DTOs - Data Transfer Objects per query di ricerca

use serde::{Deserialize, Serialize};

pub const DEFAULT_OFFER_LIMIT: u32 = 100;

/// DTO per query parameters della lista offerte (`?skip=0&limit=100&category=...`)
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OfferQuery {
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}

impl OfferQuery {
    pub fn skip(&self) -> u32 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_OFFER_LIMIT).min(DEFAULT_OFFER_LIMIT)
    }
}
