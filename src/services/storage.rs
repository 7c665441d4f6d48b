//! Image upload to the external blob store.
//!
//! DESIGN
//! ======
//! Routes see only the [`BlobStore`] trait; the production implementation
//! is [`HttpBlobStore`], a thin `reqwest` wrapper that PUTs the object to
//! `{base}/object/{bucket}/{key}` and returns its public URL. Validation is
//! pure and runs before any network call: the declared content type must be
//! PNG, JPEG, or GIF, the body must be non-empty and within the size limit,
//! and its leading bytes must carry the matching file signature.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures are client errors; transport and non-2xx responses
//! from the store are upstream errors. Route code maps both via
//! `storage_error_to_status`.

use std::time::Duration;

use axum::body::Bytes;
use uuid::Uuid;

use crate::config::StorageConfig;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("uploads are not configured")]
    Unconfigured,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image is empty")]
    Empty,
    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("image bytes do not match {0}")]
    SignatureMismatch(&'static str),
    #[error("upload request failed: {0}")]
    Request(String),
    #[error("blob store responded with status {status}")]
    Response { status: u16, body: String },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// IMAGE KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    /// Parse a `Content-Type` value, ignoring parameters and case.
    #[must_use]
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }

    fn signature_matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Jpeg => bytes.starts_with(&[0xff, 0xd8, 0xff]),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        }
    }
}

/// Check an upload before it leaves the process.
///
/// # Errors
///
/// Returns the first rule the upload breaks.
pub fn validate_image(content_type: Option<&str>, bytes: &[u8], max_bytes: usize) -> Result<ImageKind, StorageError> {
    let raw = content_type.unwrap_or_default();
    let kind = ImageKind::from_content_type(raw).ok_or_else(|| StorageError::UnsupportedType(raw.to_owned()))?;
    if bytes.is_empty() {
        return Err(StorageError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(StorageError::TooLarge { size: bytes.len(), max: max_bytes });
    }
    if !kind.signature_matches(bytes) {
        return Err(StorageError::SignatureMismatch(kind.content_type()));
    }
    Ok(kind)
}

/// Object key for a new upload.
#[must_use]
pub fn object_key(id: Uuid, kind: ImageKind) -> String {
    format!("ads/{id}.{}", kind.extension())
}

// =============================================================================
// STORE
// =============================================================================

/// Anything that can take an image and hand back a public URL.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, bytes: Bytes, kind: ImageKind) -> Result<String, StorageError>;
}

pub struct HttpBlobStore {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpBlobStore {
    /// Build a store client from config.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            bucket: config.bucket.clone(),
            api_key: config.api_key.clone(),
        })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}/object/{}/{key}", self.base_url, self.bucket)
    }

    /// URL the browser loads the image from.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{key}", self.base_url, self.bucket)
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, bytes: Bytes, kind: ImageKind) -> Result<String, StorageError> {
        let key = object_key(Uuid::new_v4(), kind);

        let mut request = self
            .http
            .put(self.upload_url(&key))
            .header(reqwest::header::CONTENT_TYPE, kind.content_type())
            .body(bytes);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| StorageError::Request(e.to_string()))?;
            return Err(StorageError::Response { status: status.as_u16(), body });
        }

        tracing::info!(%key, "image uploaded");
        Ok(self.public_url(&key))
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
