pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod images;
pub mod limits;
pub mod llm;
pub mod logging;
pub mod mealdb;
pub mod routes;
pub mod test_util;
pub mod users;

pub use auth::{JwksClient, Principal};
pub use config::Config;
pub use content::{ContentClient, ContentError};
pub use error::ApiError;
pub use images::PhotoClient;
pub use limits::QuotaSet;
pub use llm::GeminiClient;
pub use mealdb::MealDbClient;
pub use users::{ReconcileError, UserReconciler};

use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub jwks_client: JwksClient,
    pub content_client: Arc<ContentClient>,
    pub reconciler: UserReconciler,
    pub gemini_client: GeminiClient,
    pub mealdb_client: MealDbClient,
    pub photo_client: PhotoClient,
    pub quotas: QuotaSet,
}

impl AppState {
    /// Wire up all clients from configuration. The JWKS fetch is the only
    /// call that can fail here.
    pub async fn from_config(config: Config) -> Result<Self, auth::AuthError> {
        let jwks_client = JwksClient::new(&config.identity.issuer).await?;
        let content_client = Arc::new(ContentClient::new(&config.content));
        let reconciler =
            UserReconciler::new(content_client.clone(), config.content.default_role_id);
        let gemini_client = GeminiClient::new(&config.generative);
        let mealdb_client = MealDbClient::new(&config.meals);
        let photo_client = PhotoClient::new(&config.images);
        let quotas = QuotaSet::new(&config.limits);

        Ok(Self {
            config,
            jwks_client,
            content_client,
            reconciler,
            gemini_client,
            mealdb_client,
            photo_client,
            quotas,
        })
    }
}
