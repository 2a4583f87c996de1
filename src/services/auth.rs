//! Auth services - Registrazione, login e profilo corrente

use crate::core::{AppError, AppState, ConflictKind, DomainError, Principal, Resource};
use crate::dtos::{CreateUserDTO, LoginDTO, RegisterUserDTO, TokenDTO, UserDTO};
use crate::entities::Role;
use crate::repositories::StoreError;
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterUserDTO>, // JSON body
) -> Result<Json<UserDTO>, AppError> {
    // 1. Validare il DTO con validator (nome, formato email, lunghezza password)
    body.validate()?;

    // 2. Il ruolo admin è ammesso solo se abilitato in configurazione
    let role = body.role.unwrap_or(Role::Student);
    match role {
        Role::Admin if !state.allow_admin_registration => {
            warn!("Rejected self-registration as admin");
            return Err(DomainError::Forbidden {
                policy: "register_admin",
            }
            .into());
        }
        Role::Student | Role::Company | Role::Admin => {}
    }

    // 3. Email già registrata: CONFLICT
    if state.user.find_by_email(&body.email).await?.is_some() {
        warn!("Email already registered");
        return Err(DomainError::Conflict(ConflictKind::EmailTaken).into());
    }

    // 4. Hash della password
    let password_hash = state.codec.hash_password(&body.password)?;

    // 5. Salvare l'utente; il vincolo unique copre la registrazione concorrente
    let new_user = CreateUserDTO {
        name: body.name,
        email: body.email,
        password: password_hash,
        role,
    };
    let created_user = state.user.create(&new_user).await.map_err(|e| match e {
        StoreError::UniqueViolation => DomainError::Conflict(ConflictKind::EmailTaken),
        other => DomainError::Store(other),
    })?;

    info!("User {} registered with role {}", created_user.id, created_user.role);
    Ok(Json(UserDTO::from(created_user)))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>, // JSON body
) -> Result<Json<TokenDTO>, AppError> {
    // 1. Cercare l'utente tramite email
    // 2. Se non esiste o la password non corrisponde, stesso errore UNAUTHORIZED
    let user = match state.user.find_by_email(&body.email).await? {
        Some(user) if state.codec.verify_password(&body.password, &user.password) => user,
        _ => {
            warn!("Failed login attempt");
            return Err(AppError::unauthorized("Incorrect email or password"));
        }
    };

    // 3. Generare il token con l'id come subject
    let access_token = state.codec.issue_token(user.id)?;

    info!("User {} logged in", user.id);
    Ok(Json(TokenDTO {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.codec.token_ttl().num_seconds(),
        user: UserDTO::from(user),
    }))
}

#[instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>, // ottenuto dall'autenticazione tramite token jwt
) -> Result<Json<UserDTO>, AppError> {
    let user = state
        .user
        .read(&principal.id)
        .await?
        .ok_or(DomainError::NotFound(Resource::User))?;
    Ok(Json(UserDTO::from(user)))
}
