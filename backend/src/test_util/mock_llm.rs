//! JSON fixtures shaped like the generative API's responses.

use serde_json::{json, Value};

/// Response envelope carrying a single text candidate.
pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "parts": [{"text": text}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }
        ]
    })
}

/// Wrap a JSON payload in the markdown fences the model tends to emit.
pub fn fenced(payload: &Value) -> String {
    format!("```json\n{}\n```", payload)
}

pub fn scan_reply() -> Value {
    text_response(&fenced(&json!([
        {"name": "tomato", "quantity": "4", "confidence": 0.95},
        {"name": "basil", "quantity": "1 bunch", "confidence": 0.8}
    ])))
}

pub fn suggestions_reply() -> Value {
    text_response(&fenced(&json!([
        {
            "title": "Tomato Basil Pasta",
            "description": "Quick weeknight pasta.",
            "matchPercentage": 90,
            "missingIngredients": ["pasta"]
        }
    ])))
}

pub fn recipe_reply(title: &str) -> Value {
    text_response(&fenced(&json!({
        "title": title,
        "description": "A classic.",
        "category": "dinner",
        "cuisine": "Italian",
        "prepTime": 10,
        "cookTime": 20,
        "servings": 4,
        "ingredients": [{"item": "tomato", "amount": "4", "category": "vegetable"}],
        "instructions": [{"step": 1, "title": "Prep", "instruction": "Chop the tomatoes."}],
        "nutrition": {"calories": "420 kcal", "protein": "12g", "carbs": "60g", "fat": "14g"},
        "tips": ["Use ripe tomatoes."],
        "substitutions": [{"original": "basil", "alternatives": ["oregano"]}]
    })))
}
