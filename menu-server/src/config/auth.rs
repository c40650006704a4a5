//! Bearer token verification configuration

use confique::Config;
use url::Url;

const JWKS_PATH: &str = ".well-known/jwks.json";

/// Configuration of the trusted token issuer
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Trusted issuer URL, compared verbatim against the `iss` claim
    /// (e.g. https://tenant.auth0.com/)
    #[config(env = "MENU_AUTH_ISSUER")]
    pub issuer: String,

    /// Expected `aud` claim
    #[config(env = "MENU_AUTH_AUDIENCE")]
    pub audience: String,

    /// Signing key set location (default: <issuer>/.well-known/jwks.json)
    #[config(env = "MENU_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// How long a fetched key set is reused, in seconds (default: 600)
    #[config(env = "MENU_AUTH_JWKS_CACHE_TTL", default = 600)]
    pub jwks_cache_ttl: u64,

    /// Timeout for key set requests in seconds (default: 5)
    #[config(env = "MENU_AUTH_JWKS_TIMEOUT", default = 5)]
    pub jwks_timeout: u64,

    /// Accepted clock skew for `exp` in seconds (default: 0)
    #[config(env = "MENU_AUTH_LEEWAY", default = 0)]
    pub leeway: u64,
}

impl AuthConfig {
    /// Returns the URL the signing key set is fetched from
    pub fn get_jwks_url(&self) -> Result<Url, url::ParseError> {
        match &self.jwks_url {
            Some(url) => Url::parse(url),
            None => {
                // Url::join drops the last path segment unless it ends with '/'
                let mut issuer = self.issuer.clone();
                if !issuer.ends_with('/') {
                    issuer.push('/');
                }
                Url::parse(&issuer)?.join(JWKS_PATH)
            }
        }
    }
}
