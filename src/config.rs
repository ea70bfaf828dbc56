use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for extraction and rewriting when none is specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Remote recipe database
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            database: DatabaseConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.5-pro", "gpt-4.1"); empty means
    /// the provider's default
    #[serde(default)]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Enabled provider config with default tuning for the given model
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            enabled: true,
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Firebase Realtime Database settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Database root, e.g. `https://my-app-default-rtdb.firebaseio.com`
    pub url: Option<String>,
    /// Database secret or ID token appended as `?auth=`
    pub auth: Option<String>,
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_timeout() -> u64 {
    120
}

/// Default model for a known provider name
pub fn default_model(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "google" => Some("gemini-2.5-pro"),
        "openai" => Some("gpt-4.1"),
        _ => None,
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Provider config by name, falling back to an enabled default for known
    /// providers so that an API key in the environment is enough to run.
    pub fn provider(&self, name: &str) -> Option<ProviderConfig> {
        let Some(configured) = self.providers.get(name) else {
            return default_model(name).map(ProviderConfig::for_model);
        };

        let mut config = configured.clone();
        if config.model.is_empty() {
            config.model = default_model(name).unwrap_or_default().to_string();
        }
        Some(config)
    }

    /// Database URL from config or the FIREBASE_DATABASE_URL variable
    pub fn database_url(&self) -> Option<String> {
        self.database
            .url
            .clone()
            .or_else(|| std::env::var("FIREBASE_DATABASE_URL").ok())
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPES__DATABASE__URL
        .add_source(
            Environment::with_prefix("RECIPES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
