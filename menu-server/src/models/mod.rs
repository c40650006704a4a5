use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single ingredient of a drink recipe
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Color used to render the ingredient
    pub color: String,
    /// Relative amount of the ingredient in the drink
    pub parts: u32,
}

/// Ordered sequence of ingredients, persisted as serialized JSON text
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Recipe(pub Vec<Ingredient>);

impl Recipe {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Recipe as accepted in request bodies: either a list of ingredients or a
/// single ingredient object
#[derive(Debug, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl From<RecipeInput> for Recipe {
    fn from(input: RecipeInput) -> Self {
        match input {
            RecipeInput::Many(ingredients) => Recipe(ingredients),
            RecipeInput::One(ingredient) => Recipe(vec![ingredient]),
        }
    }
}

/// Short projection of a drink, exposed on the public listing
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
}

/// Long projection of a drink including its recipe
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

impl From<DrinkLong> for DrinkShort {
    fn from(drink: DrinkLong) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
        }
    }
}
