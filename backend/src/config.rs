//! Configuration for the Pantry Chef backend.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub content: ContentConfig,
    pub generative: GenerativeConfig,
    #[serde(default)]
    pub meals: MealsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// External identity provider (OIDC). Consumed, never implemented here.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Issuer URL used for discovery and token validation.
    pub issuer: String,
    /// Expected audience (client ID). Empty disables audience checks.
    #[serde(default)]
    pub audience: String,
}

/// Headless CMS backend store holding users, pantry items and recipes.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    pub base_url: String,
    /// Bearer credential for admin-scope operations. Lookups can proceed
    /// without it; writes are skipped with a warning.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Role id used when the "authenticated" role cannot be resolved.
    #[serde(default = "default_role_id")]
    pub default_role_id: i64,
}

/// Generative content API.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_generative_model")]
    pub model: String,
}

/// Public meal lookup API.
#[derive(Debug, Clone, Deserialize)]
pub struct MealsConfig {
    #[serde(default = "default_meals_url")]
    pub base_url: String,
}

impl Default for MealsConfig {
    fn default() -> Self {
        Self {
            base_url: default_meals_url(),
        }
    }
}

/// Photo search API for recipe images.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_images_url")]
    pub base_url: String,
    /// Without a key, image lookups resolve to no image.
    #[serde(default)]
    pub access_key: Option<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_images_url(),
            access_key: None,
        }
    }
}

/// Per-hour quota counts by tier.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_free_scans")]
    pub free_scans_per_hour: u32,
    #[serde(default = "default_pro_scans")]
    pub pro_scans_per_hour: u32,
    #[serde(default = "default_free_suggestions")]
    pub free_suggestions_per_hour: u32,
    #[serde(default = "default_pro_suggestions")]
    pub pro_suggestions_per_hour: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_scans_per_hour: default_free_scans(),
            pro_scans_per_hour: default_pro_scans(),
            free_suggestions_per_hour: default_free_suggestions(),
            pro_suggestions_per_hour: default_pro_suggestions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_role_id() -> i64 {
    1
}
fn default_generative_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_generative_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_meals_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}
fn default_images_url() -> String {
    "https://api.unsplash.com".to_string()
}
fn default_free_scans() -> u32 {
    5
}
fn default_pro_scans() -> u32 {
    100
}
fn default_free_suggestions() -> u32 {
    10
}
fn default_pro_suggestions() -> u32 {
    200
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cors_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (PANTRY__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("content.default_role_id", default_role_id())?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("PANTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
