use super::keys::{KeySource, RemoteKeySource};
use super::{AuthError, Claims};
use crate::config::AuthConfig;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use std::sync::Arc;

/// The only algorithm tokens may be signed with
const ALGORITHM: Algorithm = Algorithm::RS256;

/// Validates bearer tokens against the issuer's signing key set
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeySource>, issuer: &str, audience: &str, leeway: u64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = leeway;
        Self { keys, validation }
    }

    /// Build a verifier fetching keys from the configured issuer
    pub fn from_config(config: &AuthConfig) -> Result<Self, String> {
        let url = config
            .get_jwks_url()
            .map_err(|e| format!("Invalid signing key set URL: {e}"))?;
        let keys = RemoteKeySource::new(url, config.jwks_cache_ttl, config.jwks_timeout)
            .map_err(|e| format!("Failed to create key set client: {e}"))?;
        Ok(Self::new(
            Arc::new(keys),
            &config.issuer,
            &config.audience,
            config.leeway,
        ))
    }

    /// Verify the token's signature and standard claims, returning its claim set
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            warn!("Rejected token with unparsable header: {}", e);
            AuthError::invalid_header("Unable to parse authentication token.")
        })?;
        let Some(kid) = header.kid else {
            warn!("Rejected token without key identifier");
            return Err(AuthError::invalid_header("Authorization malformed."));
        };
        if header.alg != ALGORITHM {
            warn!("Rejected token signed with {:?}", header.alg);
            return Err(AuthError::invalid_header("Authorization malformed."));
        }

        let mut keys = self.keys.key_set().await?;
        if keys.find(&kid).is_none() {
            debug!("Key '{}' not in cached key set, refreshing", kid);
            keys = self.keys.refresh().await?;
        }
        let Some(jwk) = keys.find(&kid) else {
            warn!("Rejected token signed by unknown key '{}'", kid);
            return Err(AuthError::invalid_header(
                "Unable to find the appropriate key.",
            ));
        };
        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            warn!("Signing key '{}' is unusable: {}", kid, e);
            AuthError::invalid_header("Unable to find the appropriate key.")
        })?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| {
            warn!("Rejected token: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => AuthError::invalid_claims(
                    "Incorrect claims. Please, check the audience and issuer.",
                ),
                _ => AuthError::invalid_header("Unable to parse authentication token."),
            }
        })?;

        debug!("Verified token for {:?}", data.claims.sub);
        Ok(data.claims)
    }
}
