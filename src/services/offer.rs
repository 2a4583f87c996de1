//! Offer services - Pubblicazione e consultazione delle offerte

use crate::core::policy::COMPANY_OR_ADMIN;
use crate::core::{AppError, AppState, DomainError, Policy, Principal, Resource};
use crate::dtos::{CreateOfferDTO, OfferBodyDTO, OfferDTO, OfferQuery, UpdateOfferDTO};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_offers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OfferQuery>, // query params /offers?skip=0&limit=100&category=it
) -> Result<Json<Vec<OfferDTO>>, AppError> {
    let offers = state.offer.list(&params).await?;
    debug!("Found {} offers", offers.len());
    Ok(Json(offers.into_iter().map(OfferDTO::from).collect()))
}

#[instrument(skip(state), fields(offer_id = %offer_id))]
pub async fn get_offer(
    State(state): State<Arc<AppState>>,
    Path(offer_id): Path<i32>,
) -> Result<Json<OfferDTO>, AppError> {
    let offer = state
        .offer
        .read(&offer_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::Offer))?;
    Ok(Json(OfferDTO::from(offer)))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_company_offers(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<OfferDTO>>, AppError> {
    // 1. Solo aziende e admin
    Policy::role_gated("list_company_offers", COMPANY_OR_ADMIN).evaluate(&principal)?;

    // 2. Serve il profilo del chiamante
    let company = state.ownership().company_of(&principal).await?;

    // 3. Offerte del profilo
    let offers = state.offer.find_many_by_company_id(&company.id).await?;
    Ok(Json(offers.into_iter().map(OfferDTO::from).collect()))
}

#[instrument(skip(state, principal, body), fields(principal_id = %principal.id))]
pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<OfferBodyDTO>,
) -> Result<Json<OfferDTO>, AppError> {
    // 1. Solo aziende e admin, poi serve il profilo del chiamante
    Policy::role_gated("create_offer", COMPANY_OR_ADMIN).evaluate(&principal)?;
    let company = state.ownership().company_of(&principal).await?;

    // 2. Validare il body
    body.validate()?;

    // 3. Salvare l'offerta legata al profilo
    let offer = state.offer.create(&CreateOfferDTO::new(company.id, body)).await?;

    info!("Offer {} created by company {}", offer.id, company.id);
    Ok(Json(OfferDTO::from(offer)))
}

#[instrument(skip(state, principal, body), fields(principal_id = %principal.id, offer_id = %offer_id))]
pub async fn update_offer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(offer_id): Path<i32>,
    Json(body): Json<UpdateOfferDTO>,
) -> Result<Json<OfferDTO>, AppError> {
    // 1. L'offerta deve esistere
    let offer = state
        .offer
        .read(&offer_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::Offer))?;

    // 2. Proprietario o admin
    let owns = state.ownership().principal_owns_offer(&principal, &offer).await?;
    Policy::owner_or_admin("update_offer", owns).evaluate(&principal)?;

    // 3. Validare e applicare l'aggiornamento parziale
    body.validate()?;
    let updated = state
        .offer
        .update(&offer_id, &body)
        .await?
        .ok_or(DomainError::NotFound(Resource::Offer))?;

    info!("Offer {} updated", offer_id);
    Ok(Json(OfferDTO::from(updated)))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id, offer_id = %offer_id))]
pub async fn delete_offer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(offer_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let offer = state
        .offer
        .read(&offer_id)
        .await?
        .ok_or(DomainError::NotFound(Resource::Offer))?;

    let owns = state.ownership().principal_owns_offer(&principal, &offer).await?;
    Policy::owner_or_admin("delete_offer", owns).evaluate(&principal)?;

    // ON DELETE CASCADE rimuove le candidature
    if !state.offer.delete(&offer_id).await? {
        return Err(DomainError::NotFound(Resource::Offer).into());
    }

    info!("Offer {} deleted", offer_id);
    Ok(Json(json!({ "message": "Offer deleted successfully" })))
}
