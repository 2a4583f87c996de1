//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Codec delle credenziali e identità del principal
//! - Catena di proprietà e politiche di autorizzazione
//! - Macchina a stati delle candidature
//! - Configurazione, errori e stato applicazione

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod ownership;
pub mod policy;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::authentication_middleware;
pub use config::Config;
pub use credentials::{Claims, CodecError, CredentialCodec, TokenError};
pub use error::{AppError, AuthFailure, ConflictKind, DomainError, Resource};
pub use identity::{Principal, resolve_principal};
pub use lifecycle::{ApplicationLifecycle, validate_transition};
pub use ownership::{OwnershipResolver, owns_application, owns_offer, owns_profile};
pub use policy::{Policy, Predicate, guard_self_delete};
pub use state::AppState;
