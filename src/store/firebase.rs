use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::model::{Recipe, RecipeState, RecipeUpdate};
use crate::store::RecipeStore;
use crate::RecipeError;

/// Collection holding every saved recipe
const RECIPES_PATH: &str = "recipes";

/// Recipe store backed by the Firebase Realtime Database REST API.
///
/// Recipes live under `/recipes/{push-id}`. Push ids sort chronologically,
/// which is what gives [`RecipeStore::list`] its newest-first order.
pub struct FirebaseStore {
    client: Client,
    base_url: String,
    auth: Option<String>,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl FirebaseStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        FirebaseStore {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// Authenticate requests with a database secret or ID token
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Build a store from the `[database]` section of the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        let url = config.database_url().ok_or_else(|| {
            RecipeError::Store(
                "No database URL configured. Set database.url or FIREBASE_DATABASE_URL".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        let mut store = FirebaseStore::new(url).with_client(client);
        if let Some(auth) = &config.database.auth {
            store = store.with_auth(auth.clone());
        }
        Ok(store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    /// Attach the auth token as an encoded query parameter
    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.auth {
            Some(auth) => request.query(&[("auth", auth)]),
            None => request,
        }
    }

    fn recipe_url(&self, id: &str) -> Result<String, RecipeError> {
        // Characters Firebase forbids in keys would address another node
        if id.is_empty() || id.contains(|c: char| matches!(c, '.' | '$' | '#' | '[' | ']' | '/')) {
            return Err(RecipeError::NotFound(id.to_string()));
        }
        Ok(self.url(&format!("{}/{}", RECIPES_PATH, id)))
    }
}

/// Turn a non-success response into a store error carrying the body
async fn check(response: Response) -> Result<Response, RecipeError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(RecipeError::Store(format!("{}: {}", status, body)))
}

#[async_trait]
impl RecipeStore for FirebaseStore {
    async fn list(&self) -> Result<Vec<RecipeState>, RecipeError> {
        let response = check(self.request(Method::GET, self.url(RECIPES_PATH)).send().await?).await?;

        // An empty collection comes back as `null`
        let stored: Option<BTreeMap<String, RecipeState>> = response.json().await?;
        let mut recipes: Vec<RecipeState> = stored
            .unwrap_or_default()
            .into_iter()
            .map(|(id, mut state)| {
                state.id = id;
                state
            })
            .collect();
        recipes.reverse();

        debug!("Loaded {} recipes", recipes.len());
        Ok(recipes)
    }

    async fn get(&self, id: &str) -> Result<RecipeState, RecipeError> {
        let url = self.recipe_url(id)?;
        let response = check(self.request(Method::GET, url).send().await?).await?;

        let stored: Option<RecipeState> = response.json().await?;
        let mut state = stored.ok_or_else(|| RecipeError::NotFound(id.to_string()))?;
        state.id = id.to_string();
        Ok(state)
    }

    async fn add_batch(&self, recipes: &[Recipe]) -> Result<Vec<String>, RecipeError> {
        let mut ids = Vec::with_capacity(recipes.len());

        for recipe in recipes {
            let state = RecipeState::new(recipe.clone());
            let response = check(
                self.request(Method::POST, self.url(RECIPES_PATH))
                    .json(&state)
                    .send()
                    .await?,
            )
            .await?;

            let pushed: PushResponse = response.json().await?;
            info!("Saved recipe '{}' as {}", recipe.title, pushed.name);
            ids.push(pushed.name);
        }

        Ok(ids)
    }

    async fn update(&self, id: &str, update: &RecipeUpdate) -> Result<(), RecipeError> {
        let url = self.recipe_url(id)?;
        if update.is_empty() {
            debug!("Skipping empty update for {}", id);
            return Ok(());
        }

        check(self.request(Method::PATCH, url).json(update).send().await?).await?;
        debug!("Updated recipe {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RecipeError> {
        let url = self.recipe_url(id)?;
        check(self.request(Method::DELETE, url).send().await?).await?;
        info!("Deleted recipe {}", id);
        Ok(())
    }
}
