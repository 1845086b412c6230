//! Best-effort photo lookup for generated recipes.
//!
//! Recipes render fine without an image, so every failure mode here
//! (missing key, non-success status, malformed body) collapses to `None`.

use reqwest::Client;
use serde::Deserialize;

use crate::config::ImagesConfig;

pub struct PhotoClient {
    http_client: Client,
    base_url: String,
    access_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

impl PhotoClient {
    pub fn new(config: &ImagesConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
        }
    }

    /// Landscape photo URL for a recipe title, if one can be found.
    pub async fn find_photo(&self, query: &str) -> Option<String> {
        let access_key = self.access_key.as_ref()?;

        let url = format!("{}/search/photos", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .header("Authorization", format!("Client-ID {}", access_key))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "photo search returned non-success");
            return None;
        }

        let search: SearchResponse = response.json().await.ok()?;
        search.results.into_iter().next().map(|p| p.urls.regular)
    }
}
