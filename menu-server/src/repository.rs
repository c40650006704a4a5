//! Persistence of the drink menu.
//!
//! The repository owns the single `drink` table. Rows store the recipe as
//! serialized JSON text; every row is decoded back into a [`Recipe`] before it
//! leaves this module, so callers only ever see validated projections.

use crate::config::DatabaseConfig;
use crate::models::{DrinkLong, DrinkShort, Ingredient, Recipe};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS drink (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
)";

/// Errors that can occur during drink store operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("No drinks available")]
    Empty,
    #[error("Drink title must not be empty")]
    EmptyTitle,
    #[error("Drink {0} not found")]
    NotFound(i64),
    #[error("Stored recipe of drink {id} is malformed: {source}")]
    MalformedRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize recipe: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for DrinkLong {
    type Error = RepositoryError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = Recipe::from_text(&row.recipe).map_err(|source| {
            RepositoryError::MalformedRecipe {
                id: row.id,
                source,
            }
        })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

/// Drink store backed by a SQLite connection pool
#[derive(Clone, Debug)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the pool described by the configuration and make sure the drink
    /// table exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            // An in-memory database lives only as long as its connection
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repository = Self::new(pool);
        repository.setup().await?;
        debug!("Drink store ready at {}", config.url);
        Ok(repository)
    }

    /// Create the drink table if it does not exist yet
    pub async fn setup(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop and recreate the drink table, seeding it with a single drink
    pub async fn reset(&self) -> Result<DrinkLong, RepositoryError> {
        info!("Resetting drink store");
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(&self.pool)
            .await?;
        self.setup().await?;
        self.create(
            "water",
            Recipe(vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }]),
        )
        .await
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All drinks ordered by id, short projection. An empty table is an error.
    pub async fn list_short(&self) -> Result<Vec<DrinkShort>, RepositoryError> {
        let drinks: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, title FROM drink ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        if drinks.is_empty() {
            return Err(RepositoryError::Empty);
        }
        Ok(drinks
            .into_iter()
            .map(|(id, title)| DrinkShort { id, title })
            .collect())
    }

    /// All drinks with their recipes. An empty table is an error.
    pub async fn list_long(&self) -> Result<Vec<DrinkLong>, RepositoryError> {
        let rows: Vec<DrinkRow> = sqlx::query_as("SELECT id, title, recipe FROM drink")
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(RepositoryError::Empty);
        }
        rows.into_iter().map(DrinkLong::try_from).collect()
    }

    pub async fn create(&self, title: &str, recipe: Recipe) -> Result<DrinkLong, RepositoryError> {
        if title.is_empty() {
            return Err(RepositoryError::EmptyTitle);
        }
        let text = recipe.to_text()?;
        let id = sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(title)
            .bind(&text)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!("Created drink {} '{}'", id, title);
        Ok(DrinkLong {
            id,
            title: title.to_string(),
            recipe,
        })
    }

    /// Replace the title and, when given, the recipe of an existing drink
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        recipe: Option<Recipe>,
    ) -> Result<DrinkLong, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: DrinkRow = sqlx::query_as("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound(id))?;
        if title.is_empty() {
            return Err(RepositoryError::EmptyTitle);
        }

        let recipe_text = match &recipe {
            Some(recipe) => recipe.to_text()?,
            None => row.recipe,
        };
        sqlx::query("UPDATE drink SET title = ?, recipe = ? WHERE id = ?")
            .bind(title)
            .bind(&recipe_text)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Updated drink {}", id);
        DrinkLong::try_from(DrinkRow {
            id,
            title: title.to_string(),
            recipe: recipe_text,
        })
    }

    /// Remove a drink, returning its id
    pub async fn delete(&self, id: i64) -> Result<i64, RepositoryError> {
        let deleted = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        info!("Deleted drink {}", id);
        Ok(id)
    }
}
