//! Single deserialization boundary for the content store's response
//! envelopes.
//!
//! The store answers in three shapes depending on endpoint and version:
//! flat objects, `{"data": ...}` wrappers, and `{"id": .., "attributes":
//! {..}}` entries (populated relations nest all three). Everything is
//! flattened here before typed decoding so the rest of the crate only sees
//! flat records.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Recursively flatten store envelopes into plain objects.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                return normalize(data);
            }
            if let Some(Value::Object(attrs)) = map.remove("attributes") {
                let mut flat = serde_json::Map::new();
                if let Some(id) = map.remove("id") {
                    flat.insert("id".to_string(), id);
                }
                for (key, nested) in attrs {
                    flat.insert(key, normalize(nested));
                }
                return Value::Object(flat);
            }
            Value::Object(
                map.into_iter()
                    .map(|(key, nested)| (key, normalize(nested)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

/// Normalize then decode a single record.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(normalize(value))
}

/// Normalize then decode a list. `null` decodes as empty.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match normalize(value) {
        Value::Null => Ok(Vec::new()),
        flat => serde_json::from_value(flat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_chef_common::{PantryItem, UserRecord};
    use serde_json::json;

    #[test]
    fn flat_array_passes_through() {
        let value = json!([{"id": 1, "username": "ada", "email": "a@x.com"}]);
        let users: Vec<UserRecord> = decode_list(value).unwrap();
        assert_eq!(users[0].id, 1);
    }

    #[test]
    fn data_wrapper_is_unwrapped() {
        let value = json!({"data": [{"id": 2, "name": "rice", "quantity": "1 kg"}], "meta": {}});
        let items: Vec<PantryItem> = decode_list(value).unwrap();
        assert_eq!(items[0].name, "rice");
    }

    #[test]
    fn attributes_entry_is_flattened() {
        let value = json!({
            "data": [{"id": 3, "attributes": {"name": "flour", "quantity": "500 g"}}]
        });
        let items: Vec<PantryItem> = decode_list(value).unwrap();
        assert_eq!(items[0].id, 3);
        assert_eq!(items[0].quantity.as_deref(), Some("500 g"));
    }

    #[test]
    fn populated_relation_is_flattened_recursively() {
        let value = json!({
            "id": 10,
            "savedAt": "2025-01-01T00:00:00Z",
            "recipe": {"data": {"id": 4, "attributes": {"title": "Pho"}}}
        });
        let flat = normalize(value);
        assert_eq!(flat["recipe"]["id"], 4);
        assert_eq!(flat["recipe"]["title"], "Pho");
    }

    #[test]
    fn null_data_decodes_to_empty_list() {
        let value = json!({"data": null});
        let items: Vec<PantryItem> = decode_list(value).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn single_wrapped_record_decodes() {
        let value = json!({
            "data": {"id": 5, "attributes": {"name": "salt"}}
        });
        let item: PantryItem = decode(value).unwrap();
        assert_eq!(item.name, "salt");
    }
}
