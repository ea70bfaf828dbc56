use crate::config::{AppConfig, ProviderConfig};
use crate::providers::{AiProvider, GoogleProvider, OpenAIProvider, ProviderError};
use reqwest::Client;
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn AiProvider>, ProviderError> {
        Self::create_with_timeout(provider_name, config, None)
    }

    /// Create a provider whose HTTP client gives up after `timeout`
    pub fn create_with_timeout(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn AiProvider>, ProviderError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )
            .into());
        }

        let mut client = Client::builder();
        if let Some(timeout) = timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        match provider_name {
            "google" => Ok(Box::new(GoogleProvider::new(config)?.with_client(client))),
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?.with_client(client))),
            _ => Err(format!("Unknown provider: {}", provider_name).into()),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn AiProvider>, ProviderError> {
        let provider_name = &config.default_provider;
        let provider_config = config.provider(provider_name).ok_or_else(|| {
            format!(
                "Default provider '{}' not found in configuration",
                provider_name
            )
        })?;

        Self::create_with_timeout(
            provider_name,
            &provider_config,
            Some(Duration::from_secs(config.timeout)),
        )
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider_config() -> ProviderConfig {
        let mut config = ProviderConfig::for_model("test-model");
        config.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_create_google_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("google", &config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown provider"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_provider_config();
        config.enabled = false;

        let result = ProviderFactory::create("google", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut ai_config = AppConfig::default();
        ai_config
            .providers
            .insert("google".to_string(), create_test_provider_config());

        let provider = ProviderFactory::get_default_provider(&ai_config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_get_default_provider_not_found() {
        let ai_config = AppConfig {
            default_provider: "mystery".to_string(),
            ..Default::default()
        };

        let result = ProviderFactory::get_default_provider(&ai_config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not found"));
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers, vec!["google", "openai"]);
    }
}
