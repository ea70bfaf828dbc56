use crate::config::ProviderConfig;
use crate::model::Recipe;
use crate::providers::{
    build_rewrite_prompt, format_instructions, parse_instructions, parse_recipes, AiProvider,
    ProviderError, RECIPE_EXTRACTION_PROMPT,
};
use crate::upload::Upload;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

// JSON mode only allows a top-level object, so lists are wrapped.
const RECIPES_OBJECT_HINT: &str =
    "Respond with a JSON object of the form {\"recipes\": [...]} holding that array.";
const INSTRUCTIONS_OBJECT_HINT: &str =
    "Respond with a JSON object of the form {\"instructions\": [...]} holding that array.";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    async fn complete(&self, messages: Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "response_format": { "type": "json_object" },
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("OpenAI API error ({}): {}", status, error_text).into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(content)
    }
}

/// Chat content part carrying the uploaded file
fn upload_part(upload: &Upload) -> Value {
    if upload.is_pdf() {
        json!({
            "type": "file",
            "file": { "filename": "recipe.pdf", "file_data": upload.to_data_url() }
        })
    } else {
        json!({
            "type": "image_url",
            "image_url": { "url": upload.to_data_url() }
        })
    }
}

#[async_trait]
impl AiProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn extract_recipes(&self, upload: &Upload) -> Result<Vec<Recipe>, ProviderError> {
        debug!(
            "Extracting recipes with {} from {} ({} bytes)",
            self.model,
            upload.mime_type,
            upload.data.len()
        );

        let content = self
            .complete(json!([
                {
                    "role": "system",
                    "content": format!("{}\n{}", RECIPE_EXTRACTION_PROMPT, RECIPES_OBJECT_HINT)
                },
                { "role": "user", "content": [upload_part(upload)] }
            ]))
            .await?;

        parse_recipes(&content)
    }

    async fn rewrite_instructions(
        &self,
        instructions: &[String],
        multiplier: f64,
    ) -> Result<Vec<String>, ProviderError> {
        let content = self
            .complete(json!([
                {
                    "role": "system",
                    "content": format!("{}\n{}", build_rewrite_prompt(multiplier), INSTRUCTIONS_OBJECT_HINT)
                },
                { "role": "user", "content": format_instructions(instructions)? }
            ]))
            .await?;

        parse_instructions(&content, instructions.len())
    }
}
