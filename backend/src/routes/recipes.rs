use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pantry_chef_common::{Recipe, RecipeSuggestion};

use super::{quota_error, require_user};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub recipe_name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub recipe: Recipe,
    pub from_database: bool,
    pub pro: bool,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub recipes: Vec<RecipeSuggestion>,
    pub pro: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub recipe_id: i64,
}

/// Canonical Title Case so lookups and generated titles agree.
fn normalize_title(title: &str) -> String {
    title
        .trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// POST /recipes/resolve - return the stored recipe for a title, or
/// generate, illustrate and persist a new one.
async fn resolve(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let title = normalize_title(&request.recipe_name);
    if title.is_empty() {
        return Err(ApiError::InvalidRequest("recipe name is required".to_string()));
    }
    let pro = user.subscription_tier.is_pro();

    // Cached in the content store from an earlier request?
    match state.content_client.find_recipe_by_title(&title).await {
        Ok(Some(recipe)) => {
            return Ok(Json(ResolveResponse {
                recipe,
                from_database: true,
                pro,
            }));
        }
        Ok(None) => {}
        Err(err) => {
            // A failed lookup is not fatal; generation can still serve the
            // request, at the cost of a possible duplicate title.
            tracing::warn!(title = %title, error = %err, "recipe lookup failed, generating");
        }
    }

    let mut draft = state
        .gemini_client
        .generate_recipe(&title)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    draft.title = title.clone();

    let image_url = state.photo_client.find_photo(&title).await;

    let recipe = state
        .content_client
        .create_recipe(&draft, image_url.as_deref(), user.id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(ResolveResponse {
        recipe,
        from_database: false,
        pro,
    }))
}

/// POST /recipes/suggestions - pantry-driven meal ideas.
async fn suggestions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;
    state.quotas.suggestions.check(&user).map_err(quota_error)?;

    let items = state
        .content_client
        .list_pantry_items(user.id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    if items.is_empty() {
        return Err(ApiError::InvalidRequest("pantry is empty".to_string()));
    }

    let ingredients = items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let recipes = state
        .gemini_client
        .suggest_recipes(&ingredients)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(SuggestionsResponse {
        recipes,
        pro: user.subscription_tier.is_pro(),
    }))
}

/// POST /recipes/saved - add a recipe to the caller's collection.
async fn save(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SaveRequest>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state, &headers).await?;

    state
        .content_client
        .save_recipe(user.id, request.recipe_id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(StatusCode::CREATED)
}

/// GET /recipes/saved - the caller's collection, newest first.
///
/// Store failures degrade to an empty list.
async fn saved(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let recipes = match state.content_client.saved_recipes(user.id).await {
        Ok(recipes) => recipes,
        Err(err) => {
            tracing::warn!(user_id = user.id, error = %err, "saved recipes lookup failed, returning empty");
            Vec::new()
        }
    };

    Ok(Json(recipes))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recipes/resolve", post(resolve))
        .route("/recipes/suggestions", post(suggestions))
        .route("/recipes/saved", post(save).get(saved))
        .with_state(state)
}
