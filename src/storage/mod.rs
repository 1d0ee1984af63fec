//! External image hosting.
//!
//! Product and farm pictures live in a GitHub repository. Handlers only see the
//! [`ImageStore`] trait so tests can swap in a recording double.

pub mod github;
pub mod url;

use async_trait::async_trait;
use thiserror::Error;

pub use github::GithubImageStore;
pub use url::to_raw_url;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Image store response carried no URL")]
    MissingUrl,

    #[error("Image store access token not configured")]
    NotConfigured,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// URL clients can fetch directly
    pub url: String,
    /// False when an object already lived at the path. Paths are content
    /// hashes, so such an object may be referenced by committed rows.
    pub created: bool,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `content` at `path`, replacing any existing object.
    async fn upload(&self, path: &str, content: Vec<u8>) -> Result<StoredImage, UploadError>;

    /// Remove the object at `path`. Missing objects are not an error.
    async fn remove(&self, path: &str) -> Result<(), UploadError>;
}
