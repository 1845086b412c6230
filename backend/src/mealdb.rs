//! Read-only client for the public meal lookup API.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use pantry_chef_common::{AreaEntry, CategoryEntry, MealDetail, MealSummary};

use crate::config::MealsConfig;

pub struct MealDbClient {
    http_client: Client,
    base_url: String,
}

/// Every endpoint answers `{"meals": [...]}`; a miss is `{"meals": null}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct MealsEnvelope<T> {
    #[serde(default)]
    meals: Option<Vec<T>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MealDbError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Meal API error: {0}")]
    Api(String),
}

impl MealDbClient {
    pub fn new(config: &MealsConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn random_meal(&self) -> Result<Option<MealDetail>, MealDbError> {
        let envelope: MealsEnvelope<MealDetail> = self.get("/random.php", &[]).await?;
        Ok(envelope.meals.unwrap_or_default().into_iter().next())
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryEntry>, MealDbError> {
        let envelope: MealsEnvelope<CategoryEntry> =
            self.get("/list.php", &[("c", "list")]).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    pub async fn list_areas(&self) -> Result<Vec<AreaEntry>, MealDbError> {
        let envelope: MealsEnvelope<AreaEntry> = self.get("/list.php", &[("a", "list")]).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    pub async fn meals_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<MealSummary>, MealDbError> {
        let envelope: MealsEnvelope<MealSummary> =
            self.get("/filter.php", &[("c", category)]).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    pub async fn meals_by_area(&self, area: &str) -> Result<Vec<MealSummary>, MealDbError> {
        let envelope: MealsEnvelope<MealSummary> = self.get("/filter.php", &[("a", area)]).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MealDbError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| MealDbError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MealDbError::Api(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| MealDbError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_meals_decodes_to_none() {
        let envelope: MealsEnvelope<MealSummary> =
            serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.is_none());
    }

    #[test]
    fn summary_list_decodes() {
        let json = r#"{"meals": [
            {"idMeal": "1", "strMeal": "Ramen", "strMealThumb": "https://img/1.jpg"},
            {"idMeal": "2", "strMeal": "Udon"}
        ]}"#;
        let envelope: MealsEnvelope<MealSummary> = serde_json::from_str(json).unwrap();
        let meals = envelope.meals.unwrap();
        assert_eq!(meals.len(), 2);
        assert!(meals[1].thumbnail.is_none());
    }
}
