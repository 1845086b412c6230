//! Public meal browsing, proxied from the external meal API. No auth.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use pantry_chef_common::{AreaEntry, CategoryEntry, MealDetail, MealSummary};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MealFilter {
    pub category: Option<String>,
    pub area: Option<String>,
}

/// GET /meals/random - recipe of the day material.
async fn random(State(state): State<Arc<AppState>>) -> Result<Json<MealDetail>, ApiError> {
    let meal = state
        .mealdb_client
        .random_meal()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("no meal available".to_string()))?;
    Ok(Json(meal))
}

/// GET /meals/categories
async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryEntry>>, ApiError> {
    let categories = state
        .mealdb_client
        .list_categories()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(Json(categories))
}

/// GET /meals/areas
async fn areas(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AreaEntry>>, ApiError> {
    let areas = state
        .mealdb_client
        .list_areas()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(Json(areas))
}

/// GET /meals/filter?category=X | ?area=Y
async fn filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MealFilter>,
) -> Result<Json<Vec<MealSummary>>, ApiError> {
    let meals = match (params.category, params.area) {
        (Some(category), None) => state
            .mealdb_client
            .meals_by_category(&category)
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?,
        (None, Some(area)) => state
            .mealdb_client
            .meals_by_area(&area)
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?,
        _ => {
            return Err(ApiError::InvalidRequest(
                "exactly one of category or area is required".to_string(),
            ));
        }
    };
    Ok(Json(meals))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/meals/random", get(random))
        .route("/meals/categories", get(categories))
        .route("/meals/areas", get(areas))
        .route("/meals/filter", get(filter))
        .with_state(state)
}
