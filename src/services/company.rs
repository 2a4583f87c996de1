//! Company services - Profili aziendali

use crate::core::{AppError, AppState, DomainError, Policy, Predicate, Principal, Resource};
use crate::dtos::{CompanyDTO, UpdateCompanyDTO};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[instrument(skip(state), fields(company_id = %company_id))]
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<i32>,
) -> Result<Json<CompanyDTO>, AppError> {
    let company = state
        .company
        .read(&company_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::CompanyProfile))?;
    Ok(Json(CompanyDTO::from(company)))
}

#[instrument(skip(state, principal, body), fields(principal_id = %principal.id, company_id = %company_id))]
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<i32>,
    Json(body): Json<UpdateCompanyDTO>,
) -> Result<Json<CompanyDTO>, AppError> {
    // 1. Il profilo deve esistere
    let company = state
        .company
        .read(&company_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::CompanyProfile))?;

    // 2. Solo il proprietario del profilo o un admin
    Policy::self_only("update_company", company.user_id)
        .or(Predicate::IsAdmin)
    .evaluate(&principal)?;

    // 3. Validare e applicare
    body.validate()?;
    let updated = state
        .company
        .update(&company_id, &body)
        .await?
        .ok_or(DomainError::NotFound(Resource::CompanyProfile))?;

    info!("Company profile {} updated", company_id);
    Ok(Json(CompanyDTO::from(updated)))
}
