pub mod mock_content;
pub mod mock_llm;

use crate::auth::Principal;
use crate::config::{
    Config, ContentConfig, GenerativeConfig, IdentityConfig, ImagesConfig, LimitsConfig,
    LoggingConfig, MealsConfig, ServerConfig,
};

/// Baseline configuration for tests; point the service sections at mock
/// servers by mutating the returned value.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        identity: IdentityConfig {
            issuer: "https://test-issuer".to_string(),
            audience: "test-audience".to_string(),
        },
        content: ContentConfig {
            base_url: "http://localhost:1337".to_string(),
            api_token: Some("test-token".to_string()),
            default_role_id: 1,
        },
        generative: GenerativeConfig {
            base_url: "http://localhost:11434".to_string(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
        },
        meals: MealsConfig {
            base_url: "http://localhost:11435".to_string(),
        },
        images: ImagesConfig {
            base_url: "http://localhost:11436".to_string(),
            access_key: None,
        },
        limits: LimitsConfig::default(),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: Default::default(),
    }
}

pub fn test_principal(id: &str, email: &str, plans: Vec<&str>) -> Principal {
    Principal {
        id: id.to_string(),
        email: email.to_string(),
        username: None,
        display_name: None,
        plans: plans.iter().map(|s| s.to_string()).collect(),
    }
}
