//! JSON fixtures shaped like the content store's responses.

use serde_json::{json, Value};

/// Flat user object as the user-permissions plugin returns it.
pub fn user_json(
    id: i64,
    external_id: Option<&str>,
    email: &str,
    username: &str,
    tier: &str,
) -> Value {
    let mut user = json!({
        "id": id,
        "username": username,
        "email": email,
        "provider": "local",
        "confirmed": true,
        "blocked": false,
        "subscriptionTier": tier,
    });
    if let Some(external_id) = external_id {
        user["externalId"] = json!(external_id);
    }
    user
}

pub fn roles_json() -> Value {
    json!({
        "roles": [
            {"id": 1, "name": "Public", "description": "Default public role", "type": "public"},
            {"id": 3, "name": "Authenticated", "description": "Default role for signed-in users", "type": "authenticated"}
        ]
    })
}

/// `{id, attributes}` entry as the content API wraps collection records.
pub fn entry(id: i64, attributes: Value) -> Value {
    json!({"id": id, "attributes": attributes})
}

/// `{data: [...], meta}` collection envelope.
pub fn collection(entries: Vec<Value>) -> Value {
    json!({
        "data": entries,
        "meta": {"pagination": {"page": 1, "pageSize": 25, "total": 1}}
    })
}

/// Duplicate-key error body the store answers user creates with.
pub fn duplicate_user_json() -> Value {
    json!({
        "data": null,
        "error": {
            "status": 400,
            "name": "ApplicationError",
            "message": "Email or Username are already taken"
        }
    })
}
