use super::{AuthError, Claims};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::{header::AUTHORIZATION, HeaderMap};
use log::warn;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        warn!("Missing Authorization header");
        return Err(AuthError::invalid_header(
            "Authorization header is expected.",
        ));
    };
    let value = header.to_str().map_err(|e| {
        warn!("Failed to parse Authorization header to string: {}", e);
        AuthError::invalid_header("Authorization header must be bearer token.")
    })?;
    if value.trim().is_empty() {
        warn!("Empty Authorization header");
        return Err(AuthError::invalid_header(
            "Authorization header is expected.",
        ));
    }

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => {
            warn!("Authorization header uses unsupported scheme '{}'", scheme);
            Err(AuthError::invalid_header(
                "Authorization header must start with \"Bearer\".",
            ))
        }
        [_, token] => Ok(*token),
        [_] | [] => {
            warn!("Authorization header carries no token");
            Err(AuthError::invalid_header("Token not found."))
        }
        _ => {
            warn!("Authorization header has {} parts, expected 2", parts.len());
            Err(AuthError::invalid_header(
                "Authorization header must be bearer token.",
            ))
        }
    }
}

/// Claim set of a request whose bearer token passed verification
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Claims);

impl FromRequestParts<AppState> for VerifiedClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state.verifier.verify(token).await?;
        Ok(Self(claims))
    }
}
