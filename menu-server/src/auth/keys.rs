use super::AuthError;
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use log::{debug, error};
use moka::future::Cache as MokaCache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Provider of the issuer's signing key set, indexed by key identifier
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError>;

    /// Discard any held key set and load it again, used when a token names an unknown key
    async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.key_set().await
    }
}

/// Key set fetched over HTTP from the issuer and kept for a fixed TTL
#[derive(Clone)]
pub struct RemoteKeySource {
    client: Client,
    url: Url,
    cache: MokaCache<(), Arc<JwkSet>>,
}

impl RemoteKeySource {
    pub fn new(url: Url, ttl_secs: u64, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let cache = MokaCache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Ok(Self { client, url, cache })
    }

    async fn fetch(&self) -> Result<Arc<JwkSet>, AuthError> {
        debug!("Fetching signing keys from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                error!("Failed to fetch signing keys from {}: {}", self.url, e);
                AuthError::KeySetUnavailable(e.to_string())
            })?;
        let keys: JwkSet = response.json().await.map_err(|e| {
            error!("Signing key set at {} is malformed: {}", self.url, e);
            AuthError::KeySetUnavailable(e.to_string())
        })?;
        debug!("Fetched {} signing keys", keys.keys.len());
        Ok(Arc::new(keys))
    }
}

#[async_trait]
impl KeySource for RemoteKeySource {
    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.cache
            .try_get_with((), self.fetch())
            .await
            .map_err(|e| (*e).clone())
    }

    async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        debug!("Refreshing signing keys from {}", self.url);
        self.cache.invalidate(&()).await;
        self.key_set().await
    }
}
