use serde::{Deserialize, Serialize};

/// Meal as returned by the public meal API's filter endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

/// Full meal record from the public meal API. The API carries dozens of
/// `strIngredientN`/`strMeasureN` columns; those stay in `extra` and are
/// passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDetail {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    #[serde(rename = "strCategory")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEntry {
    #[serde(rename = "strArea")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_detail_keeps_unknown_columns() {
        let json = r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup"
        }"#;
        let meal: MealDetail = serde_json::from_str(json).unwrap();
        assert_eq!(meal.id, "52772");
        assert_eq!(meal.extra.get("strIngredient1").and_then(|v| v.as_str()), Some("soy sauce"));

        let round = serde_json::to_value(&meal).unwrap();
        assert_eq!(round["strMeasure1"], "3/4 cup");
    }
}
