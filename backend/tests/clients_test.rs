//! Integration tests for the outbound service clients against mock
//! servers.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pantry_chef_backend::config::{ContentConfig, GenerativeConfig, ImagesConfig, MealsConfig};
use pantry_chef_backend::content::{ContentClient, ContentError, NewUser};
use pantry_chef_backend::images::PhotoClient;
use pantry_chef_backend::llm::GeminiClient;
use pantry_chef_backend::mealdb::MealDbClient;
use pantry_chef_backend::test_util::{mock_content, mock_llm};
use pantry_chef_common::Tier;

fn content_client(server: &MockServer) -> ContentClient {
    ContentClient::new(&ContentConfig {
        base_url: server.uri(),
        api_token: Some("test-token".to_string()),
        default_role_id: 1,
    })
}

fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&GenerativeConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
    })
}

fn new_user() -> NewUser {
    NewUser {
        username: "ada".to_string(),
        email: "a@x.com".to_string(),
        password: "opaque".to_string(),
        confirmed: true,
        role: 1,
        external_id: "ext_1".to_string(),
        display_name: None,
        subscription_tier: Tier::Free,
    }
}

#[tokio::test]
async fn pantry_items_decode_wrapped_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry-items"))
        .and(query_param("filters[owner][id][$eq]", "42"))
        .and(query_param("sort", "createdAt:desc"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_content::collection(vec![
            mock_content::entry(1, json!({"name": "rice", "quantity": "1 kg"})),
            mock_content::entry(2, json!({"name": "beans", "quantity": "500 g"})),
        ])))
        .mount(&server)
        .await;

    let items = content_client(&server).list_pantry_items(42).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].name, "rice");
    assert_eq!(items[1].quantity.as_deref(), Some("500 g"));
}

#[tokio::test]
async fn saved_recipes_flatten_populated_relations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/saved-recipes"))
        .and(query_param("filters[user][id][$eq]", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 100,
                "attributes": {
                    "savedAt": "2025-06-01T12:00:00Z",
                    "recipe": {
                        "data": {
                            "id": 9,
                            "attributes": {"title": "Pho", "cuisine": "Vietnamese"}
                        }
                    }
                }
            }]
        })))
        .mount(&server)
        .await;

    let recipes = content_client(&server).saved_recipes(42).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].id, 9);
    assert_eq!(recipes[0].draft.title, "Pho");
}

#[tokio::test]
async fn duplicate_user_create_maps_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(mock_content::duplicate_user_json()),
        )
        .mount(&server)
        .await;

    let err = content_client(&server)
        .create_user(&new_user())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Conflict(_)));
}

#[tokio::test]
async fn user_create_without_credential_is_refused_locally() {
    let client = ContentClient::new(&ContentConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_token: None,
        default_role_id: 1,
    });

    // Refused before any socket is touched: an unreachable host would
    // otherwise surface as a transport error.
    let err = client.create_user(&new_user()).await.unwrap_err();
    assert!(matches!(err, ContentError::MissingCredential));
}

#[tokio::test]
async fn recipe_lookup_misses_cleanly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .and(query_param("filters[title][$eqi]", "Pad Thai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let found = content_client(&server)
        .find_recipe_by_title("Pad Thai")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn scan_parses_fenced_ingredient_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_llm::scan_reply()))
        .mount(&server)
        .await;

    let ingredients = gemini_client(&server)
        .scan_ingredients(&[0xFF, 0xD8, 0xFF], "image/jpeg")
        .await
        .unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0].name, "tomato");
    assert!(ingredients[1].confidence > 0.0);
}

#[tokio::test]
async fn generate_recipe_parses_structured_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_llm::recipe_reply("Tomato Soup")),
        )
        .mount(&server)
        .await;

    let draft = gemini_client(&server)
        .generate_recipe("Tomato Soup")
        .await
        .unwrap();
    assert_eq!(draft.title, "Tomato Soup");
    assert_eq!(draft.servings, 4);
    assert_eq!(draft.instructions.len(), 1);
    assert!(draft.nutrition.is_some());
}

#[tokio::test]
async fn suggestions_parse_from_pantry_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_llm::suggestions_reply()))
        .mount(&server)
        .await;

    let suggestions = gemini_client(&server)
        .suggest_recipes("tomato, basil")
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].match_percentage, 90);
    assert_eq!(suggestions[0].missing_ingredients, vec!["pasta".to_string()]);
}

#[tokio::test]
async fn generative_api_error_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let err = gemini_client(&server)
        .suggest_recipes("tomato")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("quota exhausted"));
}

#[tokio::test]
async fn meal_filter_with_null_meals_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/filter.php"))
        .and(query_param("c", "Nonexistent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meals": null})))
        .mount(&server)
        .await;

    let client = MealDbClient::new(&MealsConfig {
        base_url: server.uri(),
    });
    let meals = client.meals_by_category("Nonexistent").await.unwrap();
    assert!(meals.is_empty());
}

#[tokio::test]
async fn random_meal_decodes_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/random.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [{
                "idMeal": "52772",
                "strMeal": "Teriyaki Chicken Casserole",
                "strCategory": "Chicken",
                "strArea": "Japanese",
                "strInstructions": "Preheat oven...",
                "strMealThumb": "https://img/52772.jpg",
                "strIngredient1": "soy sauce"
            }]
        })))
        .mount(&server)
        .await;

    let client = MealDbClient::new(&MealsConfig {
        base_url: server.uri(),
    });
    let meal = client.random_meal().await.unwrap().unwrap();
    assert_eq!(meal.id, "52772");
    assert_eq!(meal.category.as_deref(), Some("Chicken"));
    assert_eq!(
        meal.extra.get("strIngredient1").and_then(|v| v.as_str()),
        Some("soy sauce")
    );
}

#[tokio::test]
async fn categories_decode_list_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list.php"))
        .and(query_param("c", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [{"strCategory": "Beef"}, {"strCategory": "Dessert"}]
        })))
        .mount(&server)
        .await;

    let client = MealDbClient::new(&MealsConfig {
        base_url: server.uri(),
    });
    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Beef");
}

#[tokio::test]
async fn photo_search_returns_first_landscape_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("query", "pad thai"))
        .and(query_param("orientation", "landscape"))
        .and(header("authorization", "Client-ID unsplash-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"urls": {"regular": "https://img.example/pad-thai.jpg", "small": "https://img.example/s.jpg"}}]
        })))
        .mount(&server)
        .await;

    let client = PhotoClient::new(&ImagesConfig {
        base_url: server.uri(),
        access_key: Some("unsplash-key".to_string()),
    });
    let url = client.find_photo("pad thai").await;
    assert_eq!(url.as_deref(), Some("https://img.example/pad-thai.jpg"));
}

#[tokio::test]
async fn photo_search_failure_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = PhotoClient::new(&ImagesConfig {
        base_url: server.uri(),
        access_key: Some("bad-key".to_string()),
    });
    assert!(client.find_photo("pad thai").await.is_none());
}
