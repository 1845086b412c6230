use base64::prelude::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use pantry_chef_common::{RecipeDraft, RecipeSuggestion, ScannedIngredient};

use crate::config::GenerativeConfig;

/// Never persist more scan results than a pantry page can hold.
const MAX_SCANNED_INGREDIENTS: usize = 20;

const SCAN_PROMPT: &str = r#"Identify food ingredients in this image. Return ONLY a valid JSON array: [{"name": "item name", "quantity": "estimated amount", "confidence": 0.95}]"#;

/// Client for the generative content API.
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Generate-content request format.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: BASE64_STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Generate-content response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerativeError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Generative API error: {0}")]
    Api(String),
}

impl GeminiClient {
    pub fn new(config: &GenerativeConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Identify pantry ingredients in a photo.
    pub async fn scan_ingredients(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<ScannedIngredient>, GenerativeError> {
        let text = self
            .generate(vec![
                Part::text(SCAN_PROMPT.to_string()),
                Part::image(mime_type, image),
            ])
            .await?;

        let mut ingredients: Vec<ScannedIngredient> = parse_json_reply(&text)?;
        ingredients.truncate(MAX_SCANNED_INGREDIENTS);
        Ok(ingredients)
    }

    /// Generate a full recipe for an already-normalized title.
    pub async fn generate_recipe(&self, title: &str) -> Result<RecipeDraft, GenerativeError> {
        let prompt = format!(
            r#"Generate a recipe for "{title}". Return ONLY a JSON object: {{
  "title": "{title}",
  "description": "string",
  "category": "breakfast|lunch|dinner|snack|dessert",
  "cuisine": "string",
  "prepTime": number,
  "cookTime": number,
  "servings": number,
  "ingredients": [{{"item": "name", "amount": "qty", "category": "type"}}],
  "instructions": [{{"step": number, "title": "string", "instruction": "string"}}],
  "nutrition": {{"calories": "qty", "protein": "qty", "carbs": "qty", "fat": "qty"}},
  "tips": ["string"],
  "substitutions": [{{"original": "name", "alternatives": ["names"]}}]
}}"#
        );

        let text = self.generate(vec![Part::text(prompt)]).await?;
        parse_json_reply(&text)
    }

    /// Suggest recipes that use the given pantry ingredients.
    pub async fn suggest_recipes(
        &self,
        ingredients: &str,
    ) -> Result<Vec<RecipeSuggestion>, GenerativeError> {
        let prompt = format!(
            r#"Suggest 5 recipes using: {ingredients}. Return ONLY JSON array: [{{"title": "name", "description": "text", "matchPercentage": number, "missingIngredients": []}}]"#
        );

        let text = self.generate(vec![Part::text(prompt)]).await?;
        parse_json_reply(&text)
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, GenerativeError> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(model = %self.model, "sending generate request");

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerativeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerativeError::Api(format!("{}: {}", status, body)));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerativeError::InvalidResponse(e.to_string()))?;

        let text: String = generated
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerativeError::InvalidResponse(
                "no text candidates in response".to_string(),
            ));
        }

        Ok(text)
    }
}

/// The model wraps JSON replies in markdown fences more often than not.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

fn parse_json_reply<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, GenerativeError> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| GenerativeError::InvalidResponse(format!("malformed JSON reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  [3]  "), "[3]");
    }

    #[test]
    fn parses_fenced_ingredient_reply() {
        let reply = "```json\n[{\"name\": \"egg\", \"quantity\": \"6\", \"confidence\": 0.9}]\n```";
        let ingredients: Vec<ScannedIngredient> = parse_json_reply(reply).unwrap();
        assert_eq!(ingredients[0].name, "egg");
    }

    #[test]
    fn rejects_non_json_reply() {
        let result: Result<Vec<ScannedIngredient>, _> =
            parse_json_reply("Sorry, I cannot identify ingredients.");
        assert!(result.is_err());
    }

    #[test]
    fn request_serializes_inline_image() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text("look".to_string()),
                    Part::image("image/png", &[1, 2, 3]),
                ],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "look");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert!(parts[1]["inline_data"]["data"].is_string());
    }
}
