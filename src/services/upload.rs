use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::info;

pub const AGENT_UPLOAD_SUBDIR: &str = "agents";
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a file")]
    MissingFile,

    #[error("Only image files are allowed!")]
    NotAnImage,

    #[error("File too large (max {0} bytes)")]
    TooLarge(usize),

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowercased extension when both the file name and the declared mime type are allowed images.
pub fn image_extension(file_name: &str, content_type: Option<&str>) -> Result<String, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or(UploadError::NotAnImage)?;

    let mime_ok = content_type
        .map(str::to_ascii_lowercase)
        .and_then(|m| m.strip_prefix("image/").map(str::to_string))
        .map_or(false, |subtype| ALLOWED_EXTENSIONS.contains(&subtype.as_str()));
    if !mime_ok {
        return Err(UploadError::NotAnImage);
    }
    Ok(extension)
}

/// Stores agent images under `<root>/agents/agent-<unix millis>.<ext>`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self { root: root.into(), max_bytes }
    }

    /// Write the image and return the public path handed to the profile store.
    pub async fn save_agent_image(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }
        let extension = image_extension(file_name, content_type)?;

        let dir = self.root.join(AGENT_UPLOAD_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        let stored_name = format!("agent-{}.{}", Utc::now().timestamp_millis(), extension);
        tokio::fs::write(dir.join(&stored_name), bytes).await?;

        info!(file = %stored_name, size = bytes.len(), "Stored agent image");
        Ok(format!("/uploads/{}/{}", AGENT_UPLOAD_SUBDIR, stored_name))
    }
}
