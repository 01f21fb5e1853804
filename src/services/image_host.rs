//! Image-hosting collaborator. Avatar sources are handed to the host,
//! which returns the canonical https URL to persist on the profile.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upload rejected by image host: {0}")]
    Rejected(String),
    #[error("invalid image host endpoint: {0}")]
    BadEndpoint(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, source: &str) -> Result<UploadedImage, ImageHostError>;
}

/// Production host: posts the source to a configured upload endpoint and
/// expects `{"secure_url": ...}` back.
pub struct HttpImageHost {
    client: reqwest::Client,
    upload_url: String,
    folder: String,
}

impl HttpImageHost {
    pub fn new(upload_url: &str, folder: &str) -> Result<Self, ImageHostError> {
        url::Url::parse(upload_url)
            .map_err(|e| ImageHostError::BadEndpoint(format!("{}: {}", upload_url, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.to_string(),
            folder: folder.to_string(),
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, source: &str) -> Result<UploadedImage, ImageHostError> {
        let response = self
            .client
            .post(&self.upload_url)
            .json(&json!({ "file": source, "folder": self.folder }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageHostError::Rejected(response.status().to_string()));
        }

        Ok(response.json::<UploadedImage>().await?)
    }
}

/// Development/test host: hands back a deterministic-shaped local URL
/// without any network traffic.
pub struct LocalImageHost {
    folder: String,
}

impl LocalImageHost {
    pub fn new(folder: &str) -> Self {
        Self { folder: folder.to_string() }
    }
}

#[async_trait]
impl ImageHost for LocalImageHost {
    async fn upload(&self, _source: &str) -> Result<UploadedImage, ImageHostError> {
        Ok(UploadedImage {
            secure_url: format!("https://images.quill.local/{}/{}", self.folder, Uuid::new_v4()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_host_rejects_bad_endpoint() {
        assert!(HttpImageHost::new("not a url", "avatars").is_err());
        assert!(HttpImageHost::new("https://upload.example/api", "avatars").is_ok());
    }

    #[tokio::test]
    async fn local_host_returns_https_url_in_folder() {
        let host = LocalImageHost::new("avatars");
        let uploaded = host.upload("https://cdn.example/raw.png").await.unwrap();
        assert!(uploaded.secure_url.starts_with("https://images.quill.local/avatars/"));
    }
}
