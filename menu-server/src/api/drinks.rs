use crate::auth::{
    PermissionGate, VerifiedClaims, DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS,
};
use crate::errors::{ApiError, ErrorBody};
use crate::models::{DrinkLong, DrinkShort, RecipeInput};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DETAIL_GATE: PermissionGate = PermissionGate::new(GET_DRINKS_DETAIL);
const CREATE_GATE: PermissionGate = PermissionGate::new(POST_DRINKS);
const UPDATE_GATE: PermissionGate = PermissionGate::new(PATCH_DRINKS);
const DELETE_GATE: PermissionGate = PermissionGate::new(DELETE_DRINKS);

/// Public drink listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShortDrinkList {
    success: bool,
    drinks: Vec<DrinkShort>,
}

/// Detailed drink listing including recipes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LongDrinkList {
    success: bool,
    drinks: Vec<DrinkLong>,
}

/// A single created or updated drink
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DrinkResult {
    success: bool,
    drinks: DrinkLong,
}

/// Identifier of a removed drink
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeleteResult {
    success: bool,
    delete: i64,
}

/// Request body for creating a drink
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct NewDrink {
    /// Unique, non-empty title
    title: String,
    /// Ingredient list, or a single ingredient
    recipe: RecipeInput,
}

/// Request body for updating a drink
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct DrinkPatch {
    /// New non-empty title
    title: String,
    /// Replacement recipe, the stored one is kept when absent
    #[serde(default)]
    recipe: Option<RecipeInput>,
}

#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks, short projection", body = ShortDrinkList),
        (status = 400, description = "No drinks available", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<ShortDrinkList>, ApiError> {
    let drinks = state.drinks.list_short().await?;
    Ok(Json(ShortDrinkList {
        success: true,
        drinks,
    }))
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = DRINKS_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer token with get:drinks-detail"),
    ),
    responses(
        (status = 200, description = "All drinks, long projection", body = LongDrinkList),
        (status = 400, description = "No drinks available", body = ErrorBody),
        (status = 401, description = "Missing or insufficient token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn list_drink_details(
    State(state): State<AppState>,
    VerifiedClaims(claims): VerifiedClaims,
) -> Result<Json<LongDrinkList>, ApiError> {
    DETAIL_GATE
        .run(claims, |_| async move {
            let drinks = state.drinks.list_long().await?;
            Ok::<_, ApiError>(Json(LongDrinkList {
                success: true,
                drinks,
            }))
        })
        .await
}

#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    request_body = NewDrink,
    params(
        ("Authorization" = String, Header, description = "Bearer token with post:drinks"),
    ),
    responses(
        (status = 200, description = "The created drink", body = DrinkResult),
        (status = 400, description = "Empty title or malformed body", body = ErrorBody),
        (status = 401, description = "Missing or insufficient token", body = ErrorBody),
        (status = 422, description = "Body does not describe a drink", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    VerifiedClaims(claims): VerifiedClaims,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<DrinkResult>, ApiError> {
    CREATE_GATE
        .run(claims, |_| async move {
            let Json(new_drink) = payload?;
            let drink = state
                .drinks
                .create(&new_drink.title, new_drink.recipe.into())
                .await?;
            Ok::<_, ApiError>(Json(DrinkResult {
                success: true,
                drinks: drink,
            }))
        })
        .await
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    request_body = DrinkPatch,
    params(
        ("id" = i64, Path, description = "Drink identifier"),
        ("Authorization" = String, Header, description = "Bearer token with patch:drinks"),
    ),
    responses(
        (status = 200, description = "The updated drink", body = DrinkResult),
        (status = 400, description = "Empty title or malformed body", body = ErrorBody),
        (status = 401, description = "Missing or insufficient token", body = ErrorBody),
        (status = 404, description = "Unknown drink", body = ErrorBody),
        (status = 422, description = "Body does not describe a drink", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    VerifiedClaims(claims): VerifiedClaims,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkPatch>, JsonRejection>,
) -> Result<Json<DrinkResult>, ApiError> {
    UPDATE_GATE
        .run(claims, |_| async move {
            let Path(id) = id?;
            let Json(patch) = payload?;
            let drink = state
                .drinks
                .update(id, &patch.title, patch.recipe.map(Into::into))
                .await?;
            Ok::<_, ApiError>(Json(DrinkResult {
                success: true,
                drinks: drink,
            }))
        })
        .await
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(
        ("id" = i64, Path, description = "Drink identifier"),
        ("Authorization" = String, Header, description = "Bearer token with delete:drinks"),
    ),
    responses(
        (status = 200, description = "Id of the removed drink", body = DeleteResult),
        (status = 401, description = "Missing or insufficient token", body = ErrorBody),
        (status = 404, description = "Unknown drink", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    VerifiedClaims(claims): VerifiedClaims,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResult>, ApiError> {
    DELETE_GATE
        .run(claims, |_| async move {
            let Path(id) = id?;
            let delete = state.drinks.delete(id).await?;
            Ok::<_, ApiError>(Json(DeleteResult {
                success: true,
                delete,
            }))
        })
        .await
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drink_details))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
}
