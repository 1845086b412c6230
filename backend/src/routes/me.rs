use axum::http::HeaderMap;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use pantry_chef_common::UserRecord;

use super::require_user;
use crate::error::ApiError;
use crate::AppState;

/// GET /me - the reconciled user record for the current principal.
async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserRecord>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(user))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}
