use confique::Config;

/// Configuration of the drink store
#[derive(Debug, Config, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection string (default: sqlite://database.db)
    #[config(env = "MENU_DATABASE_URL", default = "sqlite://database.db")]
    pub url: String,

    /// Maximum pooled connections (default: 5)
    #[config(env = "MENU_DATABASE_MAX_CONNECTIONS", default = 5)]
    pub max_connections: u32,

    /// Drop, recreate and seed the drink table on start-up (default: false)
    #[config(env = "MENU_DATABASE_RESET_ON_STARTUP", default = false)]
    pub reset_on_startup: bool,
}
