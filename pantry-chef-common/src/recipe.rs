use serde::{Deserialize, Serialize};

/// Recipe content as produced by the generative model, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cuisine: String,
    /// Minutes.
    #[serde(default)]
    pub prep_time: u32,
    /// Minutes.
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: Vec<InstructionStep>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub item: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionStep {
    pub step: u32,
    #[serde(default)]
    pub title: Option<String>,
    pub instruction: String,
}

/// Per-serving amounts, free-form strings ("350 kcal", "12g").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub fat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    pub original: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Recipe as persisted in the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    #[serde(flatten)]
    pub draft: RecipeDraft,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Pantry-driven suggestion from the generative model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub match_percentage: u8,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_decodes_model_output_with_gaps() {
        let json = r#"{
            "title": "Tomato Soup",
            "description": "Warm and simple.",
            "category": "dinner",
            "ingredients": [{"item": "tomato", "amount": "4"}],
            "instructions": [{"step": 1, "instruction": "Chop the tomatoes."}]
        }"#;
        let draft: RecipeDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.title, "Tomato Soup");
        assert_eq!(draft.servings, 0);
        assert!(draft.nutrition.is_none());
        assert_eq!(draft.instructions[0].step, 1);
    }

    #[test]
    fn recipe_flattens_draft_fields() {
        let json = r#"{
            "id": 9,
            "title": "Pad Thai",
            "cuisine": "Thai",
            "imageUrl": "https://img.example/pad-thai.jpg",
            "isPublic": true
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, 9);
        assert_eq!(recipe.draft.title, "Pad Thai");
        assert_eq!(recipe.image_url.as_deref(), Some("https://img.example/pad-thai.jpg"));
        assert!(recipe.is_public);
    }

    #[test]
    fn suggestion_decodes_with_missing_fields() {
        let json = r#"[{"title": "Frittata", "matchPercentage": 80}]"#;
        let suggestions: Vec<RecipeSuggestion> = serde_json::from_str(json).unwrap();
        assert_eq!(suggestions[0].match_percentage, 80);
        assert!(suggestions[0].missing_ingredients.is_empty());
    }
}
