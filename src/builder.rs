use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};

use crate::config::AppConfig;
use crate::providers::ProviderFactory;
use crate::upload::Upload;
use crate::{Recipe, RecipeError};

/// Represents the input source for a recipe import
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Photo or PDF on disk; the type is taken from the extension
    File(PathBuf),
    /// In-memory file contents with an explicit MIME type
    Bytes { data: Vec<u8>, mime_type: String },
}

/// AI provider used for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiService {
    Google,
    OpenAI,
}

impl AiService {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            AiService::Google => "google",
            AiService::OpenAI => "openai",
        }
    }
}

/// Builder for configuring and executing recipe extraction
#[derive(Debug, Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    provider: Option<AiService>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a photo or PDF on disk
    ///
    /// # Example
    /// ```
    /// use recipe_digitizer::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .file("/path/to/grandmas-cookbook.pdf");
    /// ```
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::File(path.into()));
        self
    }

    /// Set the input source to in-memory file contents
    ///
    /// # Example
    /// ```
    /// use recipe_digitizer::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .bytes(vec![0xff, 0xd8, 0xff], "image/jpeg");
    /// ```
    pub fn bytes(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.source = Some(InputSource::Bytes {
            data,
            mime_type: mime_type.into(),
        });
        self
    }

    /// Set the AI provider used for extraction
    ///
    /// # Example
    /// ```
    /// use recipe_digitizer::{AiService, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .file("card.jpg")
    ///     .provider(AiService::OpenAI);
    /// ```
    pub fn provider(mut self, provider: AiService) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a timeout for the AI request
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the provider instead of relying on environment
    /// variables or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Read the upload and extract every recipe found in it
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - No input source was specified
    /// - The file cannot be read or is not a JPG, PNG, WEBP or PDF
    /// - The provider is not configured
    /// - The AI service fails or returns something other than a recipe list
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_digitizer::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipes = RecipeImporter::builder()
    ///     .file("recipe-card.jpg")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Vec<Recipe>, RecipeError> {
        let source = self.source.ok_or_else(|| {
            RecipeError::BuilderError(
                "No input source specified. Use .file() or .bytes()".to_string(),
            )
        })?;

        let upload = match source {
            InputSource::File(path) => Upload::from_path(&path).await?,
            InputSource::Bytes { data, mime_type } => Upload::new(data, mime_type)?,
        };

        let config = AppConfig::load().unwrap_or_else(|e| {
            debug!("Using default configuration: {}", e);
            AppConfig::default()
        });
        let provider_name = self
            .provider
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| config.default_provider.clone());

        let mut provider_config = config
            .provider(&provider_name)
            .ok_or_else(|| {
                RecipeError::BuilderError(format!(
                    "Provider '{}' not found in configuration",
                    provider_name
                ))
            })?;
        if let Some(api_key) = self.api_key {
            provider_config.api_key = Some(api_key);
        }
        if let Some(model) = self.model {
            provider_config.model = model;
        }

        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout));
        let provider =
            ProviderFactory::create_with_timeout(&provider_name, &provider_config, Some(timeout))
                .map_err(|e| RecipeError::BuilderError(e.to_string()))?;

        let recipes = provider
            .extract_recipes(&upload)
            .await
            .map_err(|e| RecipeError::Extraction(e.to_string()))?;

        info!(
            "Extracted {} recipe(s) using {}",
            recipes.len(),
            provider.provider_name()
        );
        Ok(recipes)
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_digitizer::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
