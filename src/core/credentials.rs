//! Credential codec - Hash delle password e token di identità firmati
//!
//! I token sono JWT HS256 senza stato: non esiste revoca, un token resta
//! valido fino a `exp` anche se l'utente cambia password.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // id dell'utente
    pub exp: usize,  // Expiry time of the token
    pub iat: usize,  // Issued at time of the token
}

/// Motivo per cui un token è stato rifiutato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Firma errata, token malformato o subject non numerico
    #[error("invalid token")]
    Invalid,

    /// Firma corretta ma `exp` già passato
    #[error("expired token")]
    Expired,
}

/// Errori nel produrre credenziali (hash o firma)
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token signing failed: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    hash_cost: u32,
}

impl CredentialCodec {
    pub fn new(secret: &str, token_ttl: Duration, hash_cost: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // nessuna tolleranza: un token scaduto da un secondo è scaduto
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl,
            hash_cost,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    #[instrument(skip_all)]
    pub fn hash_password(&self, plaintext: &str) -> Result<String, CodecError> {
        bcrypt::hash(plaintext, self.hash_cost).map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            CodecError::from(e)
        })
    }

    /// Un digest malformato è trattato come password errata
    pub fn verify_password(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::verify(plaintext, digest).unwrap_or(false)
    }

    pub fn issue_token(&self, subject_id: i32) -> Result<String, CodecError> {
        self.issue_token_with_ttl(subject_id, self.token_ttl)
    }

    #[instrument(skip(self), fields(subject_id = %subject_id))]
    pub fn issue_token_with_ttl(&self, subject_id: i32, ttl: Duration) -> Result<String, CodecError> {
        debug!("Encoding JWT token for user");
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode JWT token: {:?}", e);
            CodecError::from(e)
        })
    }

    /// Verifica firma e scadenza, restituisce l'id del subject
    pub fn verify_token(&self, token: &str) -> Result<i32, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        data.claims.sub.parse::<i32>().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> CredentialCodec {
        CredentialCodec::new("test-secret", Duration::minutes(30), 4)
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let codec = codec();
        let digest = codec.hash_password("correct horse").unwrap();
        assert_ne!(digest, "correct horse");
        assert!(codec.verify_password("correct horse", &digest));
        assert!(!codec.verify_password("battery staple", &digest));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        assert!(!codec().verify_password("whatever", "not-a-bcrypt-digest"));
    }

    #[test]
    fn issued_token_yields_its_subject() {
        let codec = codec();
        let token = codec.issue_token(42).unwrap();
        assert_eq!(codec.verify_token(&token), Ok(42));
    }

    #[test]
    fn token_expired_one_second_ago_is_expired() {
        let codec = codec();
        let token = codec.issue_token_with_ttl(7, Duration::seconds(-1)).unwrap();
        assert_eq!(codec.verify_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_token_is_invalid_not_expired() {
        let codec = codec();
        let token = codec.issue_token(7).unwrap();
        let other = codec.issue_token(8).unwrap();
        // payload del token 8 con la firma del token 7
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(codec.verify_token(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let foreign = CredentialCodec::new("other-secret", Duration::minutes(30), 4);
        let token = foreign.issue_token(7).unwrap();
        assert_eq!(codec().verify_token(&token), Err(TokenError::Invalid));
        assert_eq!(codec().verify_token("garbage"), Err(TokenError::Invalid));
    }

    #[test]
    fn non_numeric_subject_is_invalid() {
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (now + Duration::minutes(5)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(codec().verify_token(&token), Err(TokenError::Invalid));
    }
}
