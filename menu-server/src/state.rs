use crate::auth::TokenVerifier;
use crate::config::MenuConfig;
use crate::repository::DrinkRepository;
use log::info;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MenuConfig>,
    pub drinks: Arc<DrinkRepository>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn with_components(
        config: MenuConfig,
        drinks: DrinkRepository,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            config: Arc::new(config),
            drinks: Arc::new(drinks),
            verifier: Arc::new(verifier),
        }
    }

    /// Open the drink store and set up token verification from configuration
    pub async fn new(config: MenuConfig) -> Result<Self, String> {
        let drinks = DrinkRepository::connect(&config.database)
            .await
            .map_err(|e| format!("Failed to open drink store: {}", e))?;
        if config.database.reset_on_startup {
            drinks
                .reset()
                .await
                .map_err(|e| format!("Failed to reset drink store: {}", e))?;
        }
        let verifier = TokenVerifier::from_config(&config.auth)?;
        info!(
            "Accepting tokens from issuer '{}' for audience '{}'",
            config.auth.issuer, config.auth.audience
        );
        Ok(Self::with_components(config, drinks, verifier))
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> bool {
        self.drinks.ping().await.is_ok()
    }
}
