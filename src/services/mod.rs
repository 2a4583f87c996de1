//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod admin;
pub mod application;
pub mod auth;
pub mod company;
pub mod offer;

// Re-exports per facilitare l'import
pub use admin::{delete_user, get_stats, list_applications, list_companies, list_users};
pub use application::{
    apply_to_offer, get_application, list_company_applications, list_my_applications,
    update_application_status,
};
pub use auth::{get_me, login_user, register_user};
pub use company::{get_company, update_company};
pub use offer::{
    create_offer, delete_offer, get_offer, list_company_offers, list_offers, update_offer,
};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Internship server is running!")
}
