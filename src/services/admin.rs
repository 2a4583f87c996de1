//! Admin services - Elenchi, statistiche e cancellazione utenti

use crate::core::policy::ADMIN_ONLY;
use crate::core::{
    AppError, AppState, DomainError, Policy, Principal, Resource, guard_self_delete,
};
use crate::dtos::{ApplicationDTO, CompanyDTO, StatsDTO, UserDTO};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

fn require_admin(principal: &Principal, operation: &'static str) -> Result<(), DomainError> {
    Policy::role_gated(operation, ADMIN_ONLY).evaluate(principal)
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    require_admin(&principal, "admin_list_users")?;
    let users = state.user.list().await?;
    Ok(Json(users.into_iter().map(UserDTO::from).collect()))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<CompanyDTO>>, AppError> {
    require_admin(&principal, "admin_list_companies")?;
    let companies = state.company.list().await?;
    Ok(Json(companies.into_iter().map(CompanyDTO::from).collect()))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ApplicationDTO>>, AppError> {
    require_admin(&principal, "admin_list_applications")?;
    let applications = state.application.list().await?;
    Ok(Json(applications.into_iter().map(ApplicationDTO::from).collect()))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StatsDTO>, AppError> {
    require_admin(&principal, "admin_stats")?;

    // conteggi in parallelo
    let (users, companies, offers, applications) = tokio::try_join!(
        state.user.count(),
        state.company.count(),
        state.offer.count(),
        state.application.count(),
    )?;

    Ok(Json(StatsDTO {
        users,
        companies,
        offers,
        applications,
    }))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id, user_id = %user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    // 1. Solo admin
    require_admin(&principal, "admin_delete_user")?;

    // 2. L'utente deve esistere
    if state.user.read(&user_id).await?.is_none() {
        return Err(DomainError::NotFound(Resource::User).into());
    }

    // 3. Un admin non cancella se stesso
    guard_self_delete(&principal, user_id)?;

    // 4. Cancellazione, il resto della catena segue per cascade
    if !state.user.delete(&user_id).await? {
        return Err(DomainError::NotFound(Resource::User).into());
    }

    info!("User {} deleted", user_id);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
