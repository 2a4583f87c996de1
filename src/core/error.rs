//! Error handling - Tassonomia degli errori del dominio e traduzione HTTP
//!
//! `DomainError` è ciò che restituiscono core e services; `AppError` è la
//! sua rappresentazione HTTP. Il client vede solo lo status e un messaggio
//! statico, le cause interne (token scaduto o manomesso) finiscono nei log.

use crate::core::credentials::{CodecError, TokenError};
use crate::entities::ApplicationStatus;
use crate::repositories::StoreError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Perché una richiesta non è autenticata; mai esposto al client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing bearer token")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    /// Token valido ma l'utente non esiste più
    #[error("token subject no longer exists")]
    UnknownSubject,
}

/// Risorsa referenziata ma assente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    CompanyProfile,
    Offer,
    Application,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::User => "user",
            Resource::CompanyProfile => "company profile",
            Resource::Offer => "offer",
            Resource::Application => "application",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Esiste già una candidatura per la coppia (studente, offerta)
    AlreadyApplied,
    EmailTaken,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictKind::AlreadyApplied => "already applied",
            ConflictKind::EmailTaken => "email taken",
        })
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(AuthFailure),

    #[error("forbidden by policy '{policy}'")]
    Forbidden { policy: &'static str },

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("conflict: {0}")]
    Conflict(ConflictKind),

    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("an administrator cannot delete their own account")]
    SelfActionForbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthFailure> for DomainError {
    fn from(value: AuthFailure) -> Self {
        DomainError::Unauthenticated(value)
    }
}

// ************************* HTTP ************************* //

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            // stessa risposta per ogni causa: token mancante, manomesso, scaduto o utente cancellato
            DomainError::Unauthenticated(_) => Self::unauthorized("Could not validate credentials"),

            DomainError::Forbidden { .. } => {
                Self::forbidden("You are not authorized to perform this action")
            }

            DomainError::NotFound(resource) => Self::not_found(match resource {
                Resource::User => "User not found",
                Resource::CompanyProfile => "Company profile not found",
                Resource::Offer => "Offer not found",
                Resource::Application => "Application not found",
            }),

            DomainError::Conflict(ConflictKind::AlreadyApplied) => {
                Self::conflict("You have already applied for this offer")
            }

            DomainError::Conflict(ConflictKind::EmailTaken) => {
                Self::conflict("A user with this email already exists")
            }

            DomainError::IllegalTransition { from, to } => {
                Self::conflict("Application status can no longer be changed")
                    .with_details(format!("Cannot move an application from {from} to {to}"))
            }

            DomainError::SelfActionForbidden => {
                Self::bad_request("Cannot delete your own admin account")
            }

            DomainError::Store(err) => Self::from(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => Self::conflict("Resource already exists"),

            StoreError::ForeignKeyViolation => Self::bad_request("Referenced resource does not exist"),

            StoreError::Unavailable => Self::service_unavailable("Database unavailable"),

            StoreError::Database(_) => Self::internal_server_error("Internal server error"),
        }
    }
}

impl From<CodecError> for AppError {
    fn from(_: CodecError) -> Self {
        Self::internal_server_error("Internal server error")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
