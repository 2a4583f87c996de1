//! Admin DTOs

use serde::{Deserialize, Serialize};

/// Conteggi globali esposti da `GET /admin/stats`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatsDTO {
    pub users: i64,
    pub companies: i64,
    pub offers: i64,
    pub applications: i64,
}
