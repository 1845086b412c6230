use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pantry ingredient owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ingredient identified by the generative model in a pantry photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanned_ingredient_decodes_model_output() {
        let json = r#"[{"name": "tomato", "quantity": "3", "confidence": 0.95}, {"name": "basil"}]"#;
        let items: Vec<ScannedIngredient> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "tomato");
        assert_eq!(items[1].quantity, "");
        assert_eq!(items[1].confidence, 0.0);
    }
}
