//! Upload storage for listing media and profile images.
//!
//! Files land in a single flat directory served statically under
//! `/uploads`; stored documents reference them by the public
//! `/uploads/<name>` path string. Only image content types are accepted
//! and each file is size-capped (5 MB by default), mirroring what the
//! upload forms enforce client-side.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct FileStore {
    // ---
    root: PathBuf,
    max_file_bytes: usize,
}

impl FileStore {
    // ---
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: usize) -> Self {
        // ---
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        // ---
        Self::new(config.dir.clone(), config.max_file_bytes)
    }

    pub fn root(&self) -> &Path {
        // ---
        &self.root
    }

    pub fn max_file_bytes(&self) -> usize {
        // ---
        self.max_file_bytes
    }

    /// Ensure the upload directory exists. Called once at startup.
    pub async fn init(&self) -> anyhow::Result<()> {
        // ---
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes one uploaded image and returns its public path reference.
    ///
    /// Rejects non-image content types and files over the size cap with
    /// `Validation`; filesystem failures surface as `Upstream`.
    pub async fn save_image(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String, ApiError> {
        // ---
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(ApiError::Validation(
                "only image files are allowed".to_string(),
            ));
        }

        if data.len() > self.max_file_bytes {
            return Err(ApiError::Validation(format!(
                "file exceeds the {} byte upload limit",
                self.max_file_bytes
            )));
        }

        // Generated name, original extension kept when it is plain ascii.
        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        let file_name = format!("{}{extension}", Uuid::new_v4());

        fs::write(self.root.join(&file_name), data)
            .await
            .map_err(|e| ApiError::Upstream(anyhow::anyhow!("failed to store upload: {e}")))?;

        Ok(format!("/uploads/{file_name}"))
    }
}
