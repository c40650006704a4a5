pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::database::DatabaseConfig;
use confique::Config;

pub mod auth;
pub mod database;

/// Optional configuration file read next to the binary
pub const CONFIG_FILE: &str = "menu-server.toml";

/// Main configuration structure for the menu server
#[derive(Debug, Config, Clone)]
pub struct MenuConfig {
    /// The port the menu server will listen to (default: 5000)
    #[config(env = "MENU_PORT", default = 5000)]
    pub port: u16,

    /// Token issuer and key set configuration
    #[config(nested)]
    pub auth: AuthConfig,

    /// Drink store configuration
    #[config(nested)]
    pub database: DatabaseConfig,
}

impl MenuConfig {
    /// Loads the configuration from environment variables, falling back to
    /// the optional config file and then to defaults
    pub fn new() -> Result<Self, String> {
        Self::builder()
            .env()
            .file(CONFIG_FILE)
            .load()
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mock(issuer_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            auth: AuthConfig {
                issuer: format!("{}/", issuer_mock.uri()),
                audience: crate::test_utils::TEST_AUDIENCE.to_string(),
                jwks_url: None,
                jwks_cache_ttl: 60,
                jwks_timeout: 2,
                leeway: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                reset_on_startup: false,
            },
        }
    }
}
