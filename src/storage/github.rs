//! GitHub contents API client used as the image host.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ImageStore, StoredImage, UploadError, to_raw_url};
use crate::config::ImageStoreConfig;

pub struct GithubImageStore {
    client: reqwest::Client,
    config: ImageStoreConfig,
}

#[derive(Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct PutContentRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    committer: Committer<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Serialize)]
struct DeleteContentRequest<'a> {
    message: String,
    sha: String,
    branch: &'a str,
    committer: Committer<'a>,
}

#[derive(Deserialize)]
struct ExistingContent {
    sha: String,
}

#[derive(Deserialize)]
struct PutContentResponse {
    content: Option<ContentInfo>,
}

#[derive(Deserialize)]
struct ContentInfo {
    html_url: Option<String>,
    download_url: Option<String>,
}

impl GithubImageStore {
    pub fn new(config: ImageStoreConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("farm_market/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            "Image store: {}/{} on branch {}",
            config.owner, config.repo, config.branch
        );
        Ok(Self { client, config })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/')
        )
    }

    fn token(&self) -> Result<&str, UploadError> {
        self.config
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(UploadError::NotConfigured)
    }

    fn committer(&self) -> Committer<'_> {
        Committer {
            name: &self.config.author_name,
            email: &self.config.author_email,
        }
    }

    /// Current blob sha at `path`, if the file exists.
    async fn existing_sha(&self, path: &str) -> Result<Option<String>, UploadError> {
        let resp = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(self.token()?)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(resp.json::<ExistingContent>().await?.sha)),
            s => Err(UploadError::Rejected {
                status: s.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl ImageStore for GithubImageStore {
    async fn upload(&self, path: &str, content: Vec<u8>) -> Result<StoredImage, UploadError> {
        let token = self.token()?;
        let sha = self.existing_sha(path).await?;
        let created = sha.is_none();
        if !created {
            debug!("Replacing existing image at {}", path);
        }

        let body = PutContentRequest {
            message: format!("Upload {}", path),
            content: STANDARD.encode(&content),
            branch: &self.config.branch,
            committer: self.committer(),
            sha,
        };

        let resp = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let info = resp
            .json::<PutContentResponse>()
            .await?
            .content
            .ok_or(UploadError::MissingUrl)?;
        let url = info
            .html_url
            .or(info.download_url)
            .ok_or(UploadError::MissingUrl)?;

        info!(created, "Uploaded image {} ({} bytes)", path, content.len());
        Ok(StoredImage {
            url: to_raw_url(&url),
            created,
        })
    }

    async fn remove(&self, path: &str) -> Result<(), UploadError> {
        let token = self.token()?;
        let Some(sha) = self.existing_sha(path).await? else {
            return Ok(());
        };

        let body = DeleteContentRequest {
            message: format!("Remove {}", path),
            sha,
            branch: &self.config.branch,
            committer: self.committer(),
        };

        let resp = self
            .client
            .delete(self.contents_url(path))
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() && resp.status() != StatusCode::NOT_FOUND {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("Image removal for {} failed with {}", path, status);
            return Err(UploadError::Rejected { status, body });
        }
        Ok(())
    }
}
