//! Identity - Dal bearer token al principal che agisce
//!
//! Il principal è ricostruito a ogni richiesta: il ruolo viene letto dallo
//! store, non dal token, e non c'è alcuna cache fra richieste.

use crate::core::credentials::CredentialCodec;
use crate::core::error::{AuthFailure, DomainError};
use crate::entities::{Role, User};
use crate::repositories::UserStore;
use tracing::{debug, instrument, warn};

/// Identità autenticata di una richiesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

#[instrument(skip_all)]
pub async fn resolve_principal(
    codec: &CredentialCodec,
    users: &dyn UserStore,
    token: &str,
) -> Result<Principal, DomainError> {
    // 1. Verifica firma e scadenza
    let subject_id = codec.verify_token(token).map_err(|kind| {
        warn!("Rejected bearer token: {}", kind);
        AuthFailure::Token(kind)
    })?;

    // 2. Il subject deve esistere ancora
    let user = users.read(&subject_id).await?.ok_or_else(|| {
        warn!("Token subject {} no longer exists", subject_id);
        AuthFailure::UnknownSubject
    })?;

    debug!("Resolved principal {} with role {}", user.id, user.role);
    Ok(Principal::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::TokenError;
    use crate::dtos::CreateUserDTO;
    use crate::repositories::{Create, Delete, MemoryStore};
    use chrono::Duration;

    async fn setup() -> (CredentialCodec, MemoryStore, User) {
        let codec = CredentialCodec::new("identity-secret", Duration::minutes(5), 4);
        let store = MemoryStore::new();
        let user = store
            .create(&CreateUserDTO {
                name: "Amel".to_string(),
                email: "amel@uni.tn".to_string(),
                password: "hash".to_string(),
                role: Role::Student,
            })
            .await
            .unwrap();
        (codec, store, user)
    }

    #[tokio::test]
    async fn valid_token_resolves_id_and_stored_role() {
        let (codec, store, user) = setup().await;
        let token = codec.issue_token(user.id).unwrap();
        let principal = resolve_principal(&codec, &store, &token).await.unwrap();
        assert_eq!(principal, Principal { id: user.id, role: Role::Student });
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated_with_expired_kind() {
        let (codec, store, user) = setup().await;
        let token = codec.issue_token_with_ttl(user.id, Duration::seconds(-1)).unwrap();
        let err = resolve_principal(&codec, &store, &token).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthenticated(AuthFailure::Token(TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn deleted_subject_is_unauthenticated() {
        let (codec, store, user) = setup().await;
        let token = codec.issue_token(user.id).unwrap();
        assert!(Delete::<User, i32>::delete(&store, &user.id).await.unwrap());

        let err = resolve_principal(&codec, &store, &token).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthenticated(AuthFailure::UnknownSubject)
        ));
    }
}
