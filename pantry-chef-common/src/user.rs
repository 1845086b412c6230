use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier derived from the identity provider's plan entitlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    pub fn is_pro(self) -> bool {
        matches!(self, Tier::Pro)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Pro => write!(f, "pro"),
        }
    }
}

/// User record owned by the content store, linked to the identity provider
/// principal by `externalId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    /// Missing on records created before the identity-provider migration.
    #[serde(default)]
    pub external_id: Option<String>,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub subscription_tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Free).unwrap(), "\"free\"");
        assert_eq!(serde_json::to_string(&Tier::Pro).unwrap(), "\"pro\"");
    }

    #[test]
    fn tier_defaults_to_free() {
        assert_eq!(Tier::default(), Tier::Free);
    }

    #[test]
    fn user_record_decodes_store_payload() {
        let json = r#"{
            "id": 42,
            "username": "ada",
            "email": "ada@example.com",
            "externalId": "ext_42",
            "subscriptionTier": "pro",
            "confirmed": true,
            "provider": "local"
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.external_id.as_deref(), Some("ext_42"));
        assert_eq!(user.subscription_tier, Tier::Pro);
        assert!(user.display_name.is_none());
    }

    #[test]
    fn user_record_tolerates_missing_tier_and_external_id() {
        let json = r#"{"id": 7, "username": "pre", "email": "pre@example.com"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert!(user.external_id.is_none());
        assert_eq!(user.subscription_tier, Tier::Free);
    }
}
