//! Image hosting for catalog photos.
//!
//! Uploads are buffered in memory by the HTTP layer and forwarded one by one
//! to the image host, which answers with a public HTTPS URL.

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ImageConfig;

/// A buffered image file received from a client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image hosting is not configured")]
    NotConfigured,
    #[error("Image upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Image host rejected upload: {status} - {body}")]
    Rejected { status: u16, body: String },
    #[error("Image host response did not include a URL")]
    MissingUrl,
}

/// Destination for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store one image under `folder` and return its public URL
    async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ImageError>;
}

/// Upload images sequentially, preserving their order
pub async fn upload_all(
    store: &dyn ImageStore,
    folder: &str,
    images: Vec<ImageUpload>,
) -> Result<Vec<String>, ImageError> {
    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        debug!(folder, file = %image.file_name, bytes = image.data.len(), "Uploading image");
        urls.push(store.upload(folder, image).await?);
    }
    Ok(urls)
}

/// Build the configured image store, falling back to one that refuses uploads
pub fn from_config(config: &ImageConfig) -> Arc<dyn ImageStore> {
    match CloudinaryStore::from_config(config) {
        Some(store) => Arc::new(store),
        None => {
            warn!("Cloudinary credentials missing; image uploads are disabled");
            Arc::new(UnconfiguredImageStore)
        }
    }
}

/// Store used when no credentials are configured
pub struct UnconfiguredImageStore;

#[async_trait]
impl ImageStore for UnconfiguredImageStore {
    async fn upload(&self, _folder: &str, _image: ImageUpload) -> Result<String, ImageError> {
        Err(ImageError::NotConfigured)
    }
}

/// Signed uploads to the Cloudinary upload API
pub struct CloudinaryStore {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

impl CloudinaryStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            cloud_name,
            api_key,
            api_secret,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ImageConfig) -> Option<Self> {
        let cloud_name = config.cloud_name.clone().filter(|s| !s.is_empty())?;
        let api_key = config.api_key.clone().filter(|s| !s.is_empty())?;
        let api_secret = config.api_secret.clone().filter(|s| !s.is_empty())?;
        Some(Self::new(cloud_name, api_key, api_secret))
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.cloud_name)
    }

    /// Signature payload: signed params sorted by key and joined as a query
    /// string, followed directly by the API secret
    fn string_to_sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}", joined, api_secret)
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Self::string_to_sign(params, &self.api_secret).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ImageError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&signed);

        let part = reqwest::multipart::Part::bytes(image.data.to_vec())
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Rejected { status, body });
        }

        let body: UploadResponse = response.json().await?;
        body.secure_url
            .filter(|url| !url.is_empty())
            .ok_or(ImageError::MissingUrl)
    }
}
