//! Application services - Candidature degli studenti e decisioni delle aziende

use crate::core::policy::COMPANY_OR_ADMIN;
use crate::core::{
    AppError, AppState, DomainError, Policy, Predicate, Principal, Resource, owns_application,
};
use crate::dtos::{
    ApplicationDTO, ApplyDTO, EnrichedApplicationDTO, OfferDTO, UpdateApplicationDTO, UserDTO,
};
use crate::entities::Application;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Aggiunge offerta (e opzionalmente studente) a ogni candidatura, con letture in parallelo
async fn enrich(
    state: &AppState,
    applications: Vec<Application>,
    with_student: bool,
) -> Result<Vec<EnrichedApplicationDTO>, AppError> {
    let enriched = try_join_all(applications.into_iter().map(|application| async move {
        let offer = state.offer.read(&application.offer_id).await?;
        let student = if with_student {
            state.user.read(&application.student_id).await?
        } else {
            None
        };
        Ok::<_, AppError>(EnrichedApplicationDTO {
            id: application.id,
            status: application.status,
            applied_at: application.applied_at,
            offer: offer.map(OfferDTO::from),
            student: student.map(UserDTO::from),
        })
    }))
    .await?;
    Ok(enriched)
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_my_applications(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<EnrichedApplicationDTO>>, AppError> {
    // 1. Candidature del chiamante
    let applications = state.application.find_many_by_student_id(&principal.id).await?;
    debug!("Found {} applications", applications.len());

    // 2. Aggiungere l'offerta a ciascuna
    Ok(Json(enrich(&state, applications, false).await?))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_company_applications(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<EnrichedApplicationDTO>>, AppError> {
    // 1. Solo aziende e admin con un profilo
    Policy::role_gated("list_company_applications", COMPANY_OR_ADMIN).evaluate(&principal)?;
    let company = state.ownership().company_of(&principal).await?;

    // 2. Candidature alle offerte del profilo, con offerta e studente
    let applications = state.application.find_many_by_company_id(&company.id).await?;
    debug!("Found {} applications for company {}", applications.len(), company.id);
    Ok(Json(enrich(&state, applications, true).await?))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id, application_id = %application_id))]
pub async fn get_application(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(application_id): Path<i32>,
) -> Result<Json<EnrichedApplicationDTO>, AppError> {
    // 1. La candidatura deve esistere
    let application = state
        .application
        .read(&application_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::Application))?;

    // 2. Visibile allo studente, all'azienda dell'offerta o a un admin
    let owns_offer = state
        .ownership()
        .principal_owns_application_offer(&principal, &application)
        .await?;
    Policy::new(
        "get_application",
        vec![
            Predicate::Owns(owns_application(&principal, &application)),
            Predicate::Owns(owns_offer),
            Predicate::IsAdmin,
        ],
    )
    .evaluate(&principal)?;

    // 3. Con offerta e studente
    enrich(&state, vec![application], true)
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| DomainError::NotFound(Resource::Application).into())
}

#[instrument(skip(state, principal, body), fields(principal_id = %principal.id, offer_id = %body.offer_id))]
pub async fn apply_to_offer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<ApplyDTO>,
) -> Result<Json<ApplicationDTO>, AppError> {
    let application = state.lifecycle().apply(&principal, body.offer_id).await?;
    Ok(Json(ApplicationDTO::from(application)))
}

#[instrument(skip(state, principal, body), fields(principal_id = %principal.id, application_id = %application_id))]
pub async fn update_application_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(application_id): Path<i32>,
    Json(body): Json<UpdateApplicationDTO>,
) -> Result<Json<ApplicationDTO>, AppError> {
    let application = state
        .lifecycle()
        .transition(&principal, application_id, body.status)
        .await?;
    Ok(Json(ApplicationDTO::from(application)))
}
