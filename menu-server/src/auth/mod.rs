//! Bearer token authentication and permission checks.
//!
//! Requests carry a signed RS256 token issued by the configured identity
//! provider. [`TokenVerifier`] validates it against the issuer's published key
//! set and yields the [`Claims`]; [`PermissionGate`] then requires a specific
//! permission string before a guarded operation runs.

pub mod extract;
pub mod gate;
pub mod keys;
pub mod verifier;

pub use extract::VerifiedClaims;
pub use gate::PermissionGate;
pub use verifier::TokenVerifier;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Verified contents of a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: u64,
    /// Permission strings granted to the token, absent when the issuer does
    /// not include permissions in its tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Errors that can occur while authenticating a request
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("{0}")]
    InvalidHeader(String),
    #[error("{0}")]
    InvalidClaims(String),
    #[error("Token expired.")]
    TokenExpired,
    #[error("{0}")]
    Unauthorized(String),
    #[error("Unable to fetch signing keys: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub(crate) fn invalid_header<S: ToString>(description: S) -> Self {
        Self::InvalidHeader(description.to_string())
    }

    pub(crate) fn invalid_claims<S: ToString>(description: S) -> Self {
        Self::InvalidClaims(description.to_string())
    }

    /// Machine readable failure kind reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidHeader(_) => "invalid_header",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::TokenExpired => "token_expired",
            Self::Unauthorized(_) => "unauthorized",
            Self::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::KeySetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
