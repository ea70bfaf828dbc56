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

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Thinking tokens granted for extraction; multi-recipe PDFs need room.
const EXTRACTION_THINKING_BUDGET: u32 = 16384;

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or("GOOGLE_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleProvider {
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

    async fn generate(&self, parts: Value, generation_config: Value) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{ "parts": parts }],
                "generationConfig": generation_config
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("Google Gemini API error ({}): {}", status, error_text).into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter(|part| !part["thought"].as_bool().unwrap_or(false))
                    .filter_map(|part| part["text"].as_str())
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or("Failed to extract content from Google Gemini response")?;

        Ok(text)
    }
}

fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "The title of the recipe." },
            "description": { "type": "STRING", "description": "A brief, enticing description of the recipe. If none, create one." },
            "prepTime": { "type": "STRING", "description": "Preparation time, e.g., '20 minutes'." },
            "cookTime": { "type": "STRING", "description": "Cooking or baking time, e.g., '1 hour'." },
            "servings": { "type": "STRING", "description": "The yield of the recipe, e.g., 'Makes 12 cookies'." },
            "ingredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of ingredients with quantities and units."
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Step-by-step instructions for preparing the recipe."
            }
        },
        "required": ["title", "description", "prepTime", "cookTime", "servings", "ingredients", "instructions"]
    })
}

#[async_trait]
impl AiProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn extract_recipes(&self, upload: &Upload) -> Result<Vec<Recipe>, ProviderError> {
        debug!(
            "Extracting recipes with Gemini {} from {} ({} bytes)",
            self.model,
            upload.mime_type,
            upload.data.len()
        );

        let text = self
            .generate(
                json!([
                    { "text": RECIPE_EXTRACTION_PROMPT },
                    { "inlineData": { "mimeType": upload.mime_type, "data": upload.to_base64() } }
                ]),
                json!({
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens.saturating_add(EXTRACTION_THINKING_BUDGET),
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "ARRAY", "items": recipe_schema() },
                    "thinkingConfig": { "thinkingBudget": EXTRACTION_THINKING_BUDGET }
                }),
            )
            .await?;

        parse_recipes(&text)
    }

    async fn rewrite_instructions(
        &self,
        instructions: &[String],
        multiplier: f64,
    ) -> Result<Vec<String>, ProviderError> {
        let text = self
            .generate(
                json!([
                    { "text": build_rewrite_prompt(multiplier) },
                    { "text": format_instructions(instructions)? }
                ]),
                json!({
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens,
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
                }),
            )
            .await?;

        parse_instructions(&text, instructions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_config(base_url: Option<String>) -> ProviderConfig {
        let mut config = ProviderConfig::for_model("gemini-test");
        config.api_key = Some("test-key".to_string());
        config.base_url = base_url;
        config
    }

    fn gemini_reply(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn test_provider_name() {
        let provider = GoogleProvider::new(&test_config(None)).unwrap();
        assert_eq!(provider.provider_name(), "google");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_extract_recipes_sends_inline_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [
                    { "text": RECIPE_EXTRACTION_PROMPT },
                    { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                ]}],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_reply(
                r#"[{"title": "Pancakes", "ingredients": ["1 cup milk"], "instructions": ["Whisk."]}]"#,
            ))
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(Some(server.url()))).unwrap();
        let upload = Upload::new(vec![1, 2, 3], "image/png").unwrap();
        let recipes = provider.extract_recipes(&upload).await.unwrap();

        mock.assert_async().await;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Pancakes");
    }

    #[tokio::test]
    async fn test_extraction_token_limit_saturates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "maxOutputTokens": u32::MAX }
            })))
            .with_status(200)
            .with_body(gemini_reply("[]"))
            .create_async()
            .await;

        let mut config = test_config(Some(server.url()));
        config.max_tokens = u32::MAX;
        let provider = GoogleProvider::new(&config).unwrap();
        let upload = Upload::new(vec![1], "image/jpeg").unwrap();
        let recipes = provider.extract_recipes(&upload).await.unwrap();

        mock.assert_async().await;
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_instructions() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_body(gemini_reply(r#"["Add 4 cups flour.", "Bake 20 minutes."]"#))
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(Some(server.url()))).unwrap();
        let steps = provider
            .rewrite_instructions(
                &["Add 2 cups flour.".to_string(), "Bake 20 minutes.".to_string()],
                2.0,
            )
            .await
            .unwrap();

        assert_eq!(steps, vec!["Add 4 cups flour.", "Bake 20 minutes."]);
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(400)
            .with_body(r#"{"error": {"message": "API key not valid"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(Some(server.url()))).unwrap();
        let upload = Upload::new(vec![1], "application/pdf").unwrap();
        let err = provider.extract_recipes(&upload).await.unwrap_err();

        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("API key not valid"));
    }
}
