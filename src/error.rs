use thiserror::Error;

/// Errors that can occur while importing, storing or rewriting recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// HTTP request to the AI service or database failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading an upload from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload could not be (de)serialized
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The uploaded file is not a JPEG, PNG, WEBP or PDF
    #[error("Unsupported file type: {0}. Please upload a JPG, PNG, WEBP, or PDF file.")]
    UnsupportedFileType(String),

    /// The AI service could not extract recipes from the upload
    #[error("Could not understand the recipes from the file: {0}")]
    Extraction(String),

    /// The AI service could not rewrite the instructions
    #[error("Could not update instructions automatically: {0}")]
    Rewrite(String),

    /// The remote database rejected a request
    #[error("Database error: {0}")]
    Store(String),

    /// No recipe exists with the given id
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
