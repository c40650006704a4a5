use crate::api::{drinks, health};
use crate::errors::ErrorBody;
use crate::models::{DrinkLong, DrinkShort, Ingredient, Recipe, RecipeInput};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const DRINKS_TAG: &str = "Drinks API";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::ready_check,
        drinks::list_drinks,
        drinks::list_drink_details,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
    ),
    components(schemas(
        ErrorBody,
        Ingredient,
        Recipe,
        RecipeInput,
        DrinkShort,
        DrinkLong,
    )),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = DRINKS_TAG, description = "Drink menu endpoints"),
    ),
    info(
        title = "Coffee Shop Menu API",
        description = "Drink menu with permission-gated management",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
