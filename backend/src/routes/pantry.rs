use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pantry_chef_common::{PantryItem, ScannedIngredient};

use super::{quota_error, require_user};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub ingredients: Vec<ScannedIngredient>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkSaveRequest {
    pub ingredients: Vec<ItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct BulkSaveResponse {
    pub saved: usize,
    pub message: String,
}

/// POST /pantry/scan - identify ingredients in an uploaded photo.
async fn scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;
    state.quotas.scans.check(&user).map_err(quota_error)?;

    let mut image: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
    {
        if field.name() == Some("image") {
            let mime_type = field
                .content_type()
                .unwrap_or("image/jpeg")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            image = Some((bytes.to_vec(), mime_type));
        }
    }

    let (bytes, mime_type) =
        image.ok_or_else(|| ApiError::InvalidRequest("no image provided".to_string()))?;

    let ingredients = state
        .gemini_client
        .scan_ingredients(&bytes, &mime_type)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(ScanResponse {
        message: format!("Found {} ingredients!", ingredients.len()),
        ingredients,
    }))
}

/// POST /pantry/items - add a single item manually.
async fn add_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ItemRequest>,
) -> Result<(StatusCode, Json<PantryItem>), ApiError> {
    let user = require_user(&state, &headers).await?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidRequest("item name is required".to_string()));
    }

    let item = state
        .content_client
        .create_pantry_item(user.id, name, request.quantity.trim())
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /pantry/items/bulk - persist a scanned ingredient list.
///
/// Saves are best-effort: a failed item is skipped, the rest go through.
async fn save_bulk(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<BulkSaveRequest>,
) -> Result<Json<BulkSaveResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    if request.ingredients.is_empty() {
        return Err(ApiError::InvalidRequest("no items to save".to_string()));
    }

    let mut saved = 0;
    for item in &request.ingredients {
        let name = item.name.trim();
        if name.is_empty() {
            continue;
        }
        match state
            .content_client
            .create_pantry_item(user.id, name, item.quantity.trim())
            .await
        {
            Ok(_) => saved += 1,
            Err(err) => {
                tracing::warn!(item = name, error = %err, "failed to save pantry item, skipping");
            }
        }
    }

    Ok(Json(BulkSaveResponse {
        saved,
        message: format!("Saved {} items!", saved),
    }))
}

/// GET /pantry/items - the caller's pantry, newest first.
///
/// Store failures degrade to an empty list.
async fn list_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PantryItem>>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let items = match state.content_client.list_pantry_items(user.id).await {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(user_id = user.id, error = %err, "pantry listing failed, returning empty");
            Vec::new()
        }
    };

    Ok(Json(items))
}

/// PUT /pantry/items/:id - update name/quantity.
async fn update_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<PantryItem>, ApiError> {
    require_user(&state, &headers).await?;

    let item = state
        .content_client
        .update_pantry_item(id, request.name.trim(), request.quantity.trim())
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(item))
}

/// DELETE /pantry/items/:id
async fn delete_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_user(&state, &headers).await?;

    state
        .content_client
        .delete_pantry_item(id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pantry/scan", post(scan))
        .route("/pantry/items", post(add_item).get(list_items))
        .route("/pantry/items/bulk", post(save_bulk))
        .route("/pantry/items/:id", put(update_item).delete(delete_item))
        .with_state(state)
}
