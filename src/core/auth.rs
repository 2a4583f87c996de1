use crate::core::error::{AppError, AuthFailure, DomainError};
use crate::core::identity::resolve_principal;
use crate::core::state::AppState;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Estrae il token da `Authorization: Bearer <token>`
fn bearer_token(req: &Request) -> Result<&str, AuthFailure> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AuthFailure::MissingToken
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AuthFailure::MissingToken
        })?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => {
            warn!("Authorization header is not a bearer token");
            Err(AuthFailure::MissingToken)
        }
    }
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = bearer_token(&req).map_err(DomainError::from)?;

    let principal = resolve_principal(&state.codec, state.user.as_ref(), token).await?;
    // gli handler recuperano il principal da Extension
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(header: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&request(Some("Bearer abc.def.ghi"))), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&request(Some("bearer abc"))), Ok("abc"));
    }

    #[test]
    fn malformed_headers_are_missing_tokens() {
        for header in [None, Some("Bearer"), Some("Basic dXNlcjpwdw=="), Some("Bearer a b"), Some("")] {
            assert_eq!(bearer_token(&request(header)), Err(AuthFailure::MissingToken));
        }
    }
}
