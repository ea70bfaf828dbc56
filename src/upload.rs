use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use std::path::Path;

use crate::RecipeError;

/// MIME types the AI service accepts for recipe extraction
pub const SUPPORTED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "application/pdf"];

/// A recipe photo or document ready to be sent for extraction
#[derive(Debug, Clone)]
pub struct Upload {
    /// Raw file contents
    pub data: Vec<u8>,
    /// One of [`SUPPORTED_MIME_TYPES`]
    pub mime_type: String,
}

impl Upload {
    /// Wrap in-memory file contents, rejecting unsupported types
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, RecipeError> {
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(RecipeError::UnsupportedFileType(mime_type));
        }
        Ok(Upload { data, mime_type })
    }

    /// Read a file from disk, inferring the MIME type from its extension
    pub async fn from_path(path: &Path) -> Result<Self, RecipeError> {
        let mime_type = mime_type_for_path(path).ok_or_else(|| {
            RecipeError::UnsupportedFileType(path.display().to_string())
        })?;
        let data = tokio::fs::read(path).await?;
        debug!(
            "Read {} bytes of {} from {}",
            data.len(),
            mime_type,
            path.display()
        );
        Upload::new(data, mime_type)
    }

    /// Base64 encoding of the file contents for inline API payloads
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL of the file contents
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}

/// Infer a supported MIME type from a file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(
            mime_type_for_path(Path::new("card.JPG")),
            Some("image/jpeg")
        );
        assert_eq!(
            mime_type_for_path(Path::new("/tmp/book.pdf")),
            Some("application/pdf")
        );
        assert_eq!(mime_type_for_path(Path::new("scan.webp")), Some("image/webp"));
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_new_rejects_unsupported_type() {
        let result = Upload::new(b"GIF89a".to_vec(), "image/gif");
        assert!(matches!(result, Err(RecipeError::UnsupportedFileType(t)) if t == "image/gif"));
    }

    #[test]
    fn test_new_normalizes_mime_type() {
        let upload = Upload::new(vec![1, 2, 3], " Image/PNG ").unwrap();
        assert_eq!(upload.mime_type, "image/png");
        assert!(!upload.is_pdf());
    }

    #[test]
    fn test_data_url() {
        let upload = Upload::new(b"test data".to_vec(), "application/pdf").unwrap();
        assert_eq!(upload.to_base64(), "dGVzdCBkYXRh");
        assert_eq!(
            upload.to_data_url(),
            "data:application/pdf;base64,dGVzdCBkYXRh"
        );
        assert!(upload.is_pdf());
    }

    #[tokio::test]
    async fn test_from_path_rejects_unknown_extension() {
        let result = Upload::from_path(Path::new("recipe.txt")).await;
        assert!(matches!(result, Err(RecipeError::UnsupportedFileType(_))));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join("recipe_digitizer_upload_test.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.data, b"\x89PNG");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
