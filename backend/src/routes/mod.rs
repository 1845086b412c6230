pub mod health;
pub mod me;
pub mod meals;
pub mod pantry;
pub mod recipes;

use axum::http::HeaderMap;

use pantry_chef_common::{Tier, UserRecord};

use crate::error::ApiError;
use crate::limits::LimitExceeded;
use crate::users::ReconcileError;
use crate::AppState;

/// Authenticate the request and reconcile the principal against the user
/// store. Store outages degrade to "not authenticated" rather than a 5xx;
/// only a genuine create conflict surfaces as its own status.
pub(crate) async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserRecord, ApiError> {
    let principal = match state.jwks_client.authenticate(headers).await {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::debug!(error = %err, "request carried no valid session token");
            None
        }
    };

    match state.reconciler.reconcile(principal.as_ref()).await {
        Ok(user) => Ok(user),
        Err(ReconcileError::NotAuthenticated) => Err(ApiError::NotAuthenticated),
        Err(ReconcileError::Conflict(detail)) => Err(ApiError::Conflict(detail)),
        Err(err) => {
            tracing::warn!(error = %err, "reconciliation failed, treating session as unauthenticated");
            Err(ApiError::NotAuthenticated)
        }
    }
}

pub(crate) fn quota_error(err: LimitExceeded) -> ApiError {
    let message = match err.tier {
        Tier::Free => format!("{}. Upgrade to Pro for more!", err),
        Tier::Pro => err.to_string(),
    };
    ApiError::QuotaExceeded(message)
}
