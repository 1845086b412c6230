use chrono::Utc;
use pantry_chef_common::{PantryItem, Recipe, RecipeDraft, Tier, UserRecord};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::envelope;
use crate::config::ContentConfig;

/// Client for the headless CMS backend store.
///
/// Users live in the store's user-permissions plugin (flat JSON); pantry
/// items, recipes and saved-recipes are content collections (`data` /
/// `attributes` envelopes). All responses pass through
/// [`envelope::normalize`] before typed decoding.
pub struct ContentClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("duplicate record: {0}")]
    Conflict(String),
    #[error("admin credential missing")]
    MissingCredential,
}

/// Creation payload for the user store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmed: bool,
    pub role: i64,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub subscription_tier: Tier,
}

/// Partial update payload for the user store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<Tier>,
}

/// Authorization role as listed by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Role {
    /// Case-insensitive match against either the display name or the
    /// machine type of the role.
    pub fn matches(&self, target: &str) -> bool {
        self.name.eq_ignore_ascii_case(target)
            || self
                .kind
                .as_deref()
                .map_or(false, |kind| kind.eq_ignore_ascii_case(target))
    }
}

#[derive(Debug, Deserialize)]
struct RolesEnvelope {
    #[serde(default)]
    roles: Vec<Role>,
}

impl ContentClient {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn require_token(&self) -> Result<(), ContentError> {
        if self.api_token.is_none() {
            return Err(ContentError::MissingCredential);
        }
        Ok(())
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, ContentError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ContentError::Decode(e.to_string()))
    }

    async fn send_unit(&self, builder: RequestBuilder) -> Result<(), ContentError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn decode_user(value: Value) -> Result<UserRecord, ContentError> {
        envelope::decode(value).map_err(|e| ContentError::Decode(e.to_string()))
    }

    fn first_user(value: Value) -> Result<Option<UserRecord>, ContentError> {
        let users: Vec<UserRecord> =
            envelope::decode_list(value).map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    // ---- users ----

    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserRecord>, ContentError> {
        let value = self
            .send_json(
                self.request(Method::GET, "/api/users")
                    .query(&[("filters[externalId][$eq]", external_id)]),
            )
            .await?;
        Self::first_user(value)
    }

    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, ContentError> {
        let value = self
            .send_json(
                self.request(Method::GET, "/api/users")
                    .query(&[("filters[email][$eq]", email)]),
            )
            .await?;
        Self::first_user(value)
    }

    /// OR-filter lookup used by the create-conflict retry.
    pub async fn find_user_by_email_or_external_id(
        &self,
        email: &str,
        external_id: &str,
    ) -> Result<Option<UserRecord>, ContentError> {
        let value = self
            .send_json(self.request(Method::GET, "/api/users").query(&[
                ("filters[$or][0][email][$eq]", email),
                ("filters[$or][1][externalId][$eq]", external_id),
            ]))
            .await?;
        Self::first_user(value)
    }

    /// Create a user record. Duplicate email/username surfaces as
    /// [`ContentError::Conflict`].
    pub async fn create_user(&self, user: &NewUser) -> Result<UserRecord, ContentError> {
        self.require_token()?;
        let result = self
            .send_json(self.request(Method::POST, "/api/users").json(user))
            .await;
        match result {
            Ok(value) => Self::decode_user(value),
            Err(ContentError::Status { status, body })
                if status == StatusCode::BAD_REQUEST.as_u16()
                    || status == StatusCode::CONFLICT.as_u16() =>
            {
                Err(ContentError::Conflict(body))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn update_user(
        &self,
        id: i64,
        patch: &UserPatch,
    ) -> Result<UserRecord, ContentError> {
        self.require_token()?;
        let value = self
            .send_json(
                self.request(Method::PUT, &format!("/api/users/{}", id))
                    .json(patch),
            )
            .await?;
        Self::decode_user(value)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, ContentError> {
        let value = self
            .send_json(self.request(Method::GET, "/api/users-permissions/roles"))
            .await?;
        let roles: RolesEnvelope =
            serde_json::from_value(value).map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(roles.roles)
    }

    // ---- pantry items ----

    pub async fn list_pantry_items(&self, owner: i64) -> Result<Vec<PantryItem>, ContentError> {
        let value = self
            .send_json(self.request(Method::GET, "/api/pantry-items").query(&[
                ("filters[owner][id][$eq]", owner.to_string().as_str()),
                ("sort", "createdAt:desc"),
            ]))
            .await?;
        envelope::decode_list(value).map_err(|e| ContentError::Decode(e.to_string()))
    }

    pub async fn create_pantry_item(
        &self,
        owner: i64,
        name: &str,
        quantity: &str,
    ) -> Result<PantryItem, ContentError> {
        self.require_token()?;
        let body = json!({"data": {"name": name, "quantity": quantity, "owner": owner}});
        let value = self
            .send_json(self.request(Method::POST, "/api/pantry-items").json(&body))
            .await?;
        envelope::decode(value).map_err(|e| ContentError::Decode(e.to_string()))
    }

    pub async fn update_pantry_item(
        &self,
        id: i64,
        name: &str,
        quantity: &str,
    ) -> Result<PantryItem, ContentError> {
        self.require_token()?;
        let body = json!({"data": {"name": name, "quantity": quantity}});
        let value = self
            .send_json(
                self.request(Method::PUT, &format!("/api/pantry-items/{}", id))
                    .json(&body),
            )
            .await?;
        envelope::decode(value).map_err(|e| ContentError::Decode(e.to_string()))
    }

    pub async fn delete_pantry_item(&self, id: i64) -> Result<(), ContentError> {
        self.require_token()?;
        self.send_unit(self.request(Method::DELETE, &format!("/api/pantry-items/{}", id)))
            .await
    }

    // ---- recipes ----

    pub async fn find_recipe_by_title(&self, title: &str) -> Result<Option<Recipe>, ContentError> {
        let value = self
            .send_json(
                self.request(Method::GET, "/api/recipes")
                    .query(&[("filters[title][$eqi]", title), ("populate", "*")]),
            )
            .await?;
        let recipes: Vec<Recipe> =
            envelope::decode_list(value).map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(recipes.into_iter().next())
    }

    pub async fn create_recipe(
        &self,
        draft: &RecipeDraft,
        image_url: Option<&str>,
        author: i64,
    ) -> Result<Recipe, ContentError> {
        self.require_token()?;
        let mut data =
            serde_json::to_value(draft).map_err(|e| ContentError::Decode(e.to_string()))?;
        if let Value::Object(map) = &mut data {
            map.insert("imageUrl".to_string(), json!(image_url));
            map.insert("author".to_string(), json!(author));
            map.insert("isPublic".to_string(), json!(true));
        }
        let value = self
            .send_json(
                self.request(Method::POST, "/api/recipes")
                    .json(&json!({ "data": data })),
            )
            .await?;
        envelope::decode(value).map_err(|e| ContentError::Decode(e.to_string()))
    }

    pub async fn save_recipe(&self, user: i64, recipe: i64) -> Result<(), ContentError> {
        self.require_token()?;
        let body = json!({
            "data": {"user": user, "recipe": recipe, "savedAt": Utc::now().to_rfc3339()}
        });
        self.send_unit(self.request(Method::POST, "/api/saved-recipes").json(&body))
            .await
    }

    pub async fn saved_recipes(&self, user: i64) -> Result<Vec<Recipe>, ContentError> {
        #[derive(Deserialize)]
        struct SavedEntry {
            #[serde(default)]
            recipe: Option<Recipe>,
        }

        let value = self
            .send_json(self.request(Method::GET, "/api/saved-recipes").query(&[
                ("filters[user][id][$eq]", user.to_string().as_str()),
                ("populate[recipe][populate]", "*"),
                ("sort", "savedAt:desc"),
            ]))
            .await?;

        let entries: Vec<SavedEntry> = match envelope::normalize(value) {
            Value::Null => Vec::new(),
            flat => {
                serde_json::from_value(flat).map_err(|e| ContentError::Decode(e.to_string()))?
            }
        };
        Ok(entries.into_iter().filter_map(|e| e.recipe).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_matches_name_case_insensitively() {
        let role = Role {
            id: 3,
            name: "Authenticated".to_string(),
            kind: None,
        };
        assert!(role.matches("authenticated"));
        assert!(!role.matches("public"));
    }

    #[test]
    fn role_matches_type_field() {
        let role = Role {
            id: 3,
            name: "Default".to_string(),
            kind: Some("authenticated".to_string()),
        };
        assert!(role.matches("AUTHENTICATED"));
    }

    #[test]
    fn new_user_serializes_store_field_names() {
        let user = NewUser {
            username: "ada_k3x9".to_string(),
            email: "ada@example.com".to_string(),
            password: "opaque".to_string(),
            confirmed: true,
            role: 1,
            external_id: "ext_1".to_string(),
            display_name: None,
            subscription_tier: Tier::Free,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["externalId"], "ext_1");
        assert_eq!(value["subscriptionTier"], "free");
        assert_eq!(value["confirmed"], true);
        assert!(value.get("displayName").is_none());
    }

    #[test]
    fn user_patch_serializes_only_set_fields() {
        let patch = UserPatch {
            subscription_tier: Some(Tier::Pro),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["subscriptionTier"], "pro");
        assert!(value.get("externalId").is_none());
    }
}
