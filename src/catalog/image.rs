use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

pub const MAX_IMAGE_BYTES: usize = 5 << 20;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image file is required")]
    Missing,

    #[error("Image file is empty")]
    Empty,

    #[error("File size exceeds the 5MB limit ({size} bytes)")]
    TooLarge { size: usize },

    #[error("Unsupported file format {0:?}; only .jpg, .jpeg, and .png are allowed")]
    UnsupportedExtension(String),
}

/// A validated image, named by the SHA-256 of its content.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadedImage {
    pub fn validate(original_name: &str, content: Vec<u8>) -> Result<Self, ImageError> {
        if content.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size: content.len(),
            });
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImageError::UnsupportedExtension(original_name.to_string()));
        }
        if content.is_empty() {
            return Err(ImageError::Empty);
        }

        let digest = hex::encode(Sha256::digest(&content));
        Ok(Self {
            file_name: format!("{}.{}", digest, ext),
            content,
        })
    }

    /// Object path under `dir` (e.g. `Products/<sha256>.png`).
    pub fn object_path(&self, dir: &str) -> String {
        format!("{}/{}", dir.trim_end_matches('/'), self.file_name)
    }
}
