//! Request body extractors.
//!
//! `ApiJson` is `axum::Json` with rejections routed through `ApiError`.
//! `CatalogForm` accepts the hotel and room write bodies, which arrive either
//! as `multipart/form-data` (text fields plus `images` file parts) or as JSON.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{ApiError, ErrorCode};
use crate::config::ImageConfig;
use crate::images::ImageUpload;
use crate::AppState;

/// Multipart field name carrying image files
pub const IMAGES_FIELD: &str = "images";

/// JSON body extractor whose rejections use the API error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Text fields and buffered image files from a catalog write request
#[derive(Debug, Default)]
pub struct CatalogForm {
    fields: HashMap<String, String>,
    images: Vec<ImageUpload>,
}

impl CatalogForm {
    /// Trimmed value of a text field. Absent and blank fields are `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn take_images(&mut self) -> Vec<ImageUpload> {
        std::mem::take(&mut self.images)
    }

    /// Build from a JSON object. Arrays and objects are kept as JSON text so
    /// they parse the same way as their multipart counterparts.
    pub fn from_json(body: serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = body
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((key, text))
            })
            .collect();

        Self {
            fields,
            images: Vec::new(),
        }
    }

    pub async fn from_multipart(
        mut multipart: Multipart,
        limits: &ImageConfig,
    ) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGES_FIELD && field.file_name().is_some() {
                if form.images.len() >= limits.max_files {
                    return Err(ApiError::validation_field(
                        IMAGES_FIELD,
                        format!("Too many images (max {})", limits.max_files),
                    ));
                }

                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = image_content_type(&file_name, field.content_type())?;
                let data = field.bytes().await?;
                check_image_size(&file_name, data.len(), limits.max_file_bytes)?;

                form.images.push(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

/// Declared content type of a file part, guessed from its name when absent.
/// Only `image/*` is accepted.
fn image_content_type(file_name: &str, declared: Option<&str>) -> Result<String, ApiError> {
    let content_type = match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    if !content_type.starts_with("image/") {
        return Err(ApiError::validation_field(
            IMAGES_FIELD,
            format!("'{}' is not an image", file_name),
        ));
    }
    Ok(content_type)
}

fn check_image_size(file_name: &str, size: usize, max: usize) -> Result<(), ApiError> {
    if size > max {
        return Err(ApiError::new(
            ErrorCode::PayloadTooLarge,
            format!(
                "Image '{}' exceeds the {} MB limit",
                file_name,
                max / (1024 * 1024)
            ),
        ));
    }
    Ok(())
}

#[async_trait]
impl FromRequest<Arc<AppState>> for CatalogForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            Self::from_multipart(multipart, &state.config.images).await
        } else {
            let ApiJson(body) =
                ApiJson::<serde_json::Map<String, serde_json::Value>>::from_request(req, state)
                    .await?;
            Ok(Self::from_json(body))
        }
    }
}
