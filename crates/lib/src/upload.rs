//! Profile picture uploads.
//!
//! The image host is an external collaborator: it takes a multipart file
//! and hands back a durable URL. The engine's responsibility is the
//! client-side constraints (only JPEG/PNG/GIF/WebP, at most 2 MB), which
//! are enforced by content sniffing before any bytes leave the machine.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::settings::Settings;

/// Size cap enforced before an upload is attempted.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Errors that can occur validating or uploading an image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    /// The bytes are not one of the allowed image formats.
    #[error("unsupported image type; allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedType,

    /// The image exceeds the size cap.
    #[error("image is {size} bytes; the limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The host answered with a structured failure.
    #[error("the image host rejected the upload: {message}")]
    Rejected { message: String },

    /// The host's reply could not be used.
    #[error("the image host returned an unusable response: {reason}")]
    InvalidResponse { reason: String },

    /// Transport-level failure or timeout.
    #[error("network error talking to the image host: {reason}")]
    Network { reason: String },
}

impl UploadError {
    /// Check if this is a local constraint violation that never reached
    /// the network.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            UploadError::UnsupportedType | UploadError::TooLarge { .. }
        )
    }

    /// Check if this is a transport-level failure.
    pub fn is_network_error(&self) -> bool {
        matches!(self, UploadError::Network { .. })
    }
}

/// Image formats the profile picture may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Identify the format from magic bytes, `None` for anything else.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            Some(ImageKind::Webp)
        } else {
            None
        }
    }

    /// MIME type for the multipart part.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// Enforce the client-side constraints; the identified format on success.
pub fn check_image(bytes: &[u8]) -> Result<ImageKind, UploadError> {
    let kind = ImageKind::sniff(bytes).ok_or(UploadError::UnsupportedType)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(kind)
}

/// The image host boundary.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload validated image bytes; the durable URL on success.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError>;
}

/// HTTP multipart implementation of [`ImageHost`].
pub struct HttpImageHost {
    http: reqwest::Client,
    upload_url: Url,
}

impl HttpImageHost {
    /// Build a host client from the configured endpoint and timeout.
    pub fn new(settings: &Settings) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| UploadError::Network {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            upload_url: settings.upload_url.clone(),
        })
    }
}

/// Host reply: `{status, url?, message?}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadReply {
    status: String,
    url: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let kind = check_image(&bytes)?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(kind.mime())
            .map_err(|e| UploadError::InvalidResponse {
                reason: format!("could not label the upload part: {e}"),
            })?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(UploadError::Rejected {
                message: format!("image host returned HTTP {}", response.status()),
            });
        }

        let reply: UploadReply =
            response
                .json()
                .await
                .map_err(|e| UploadError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        match reply.url {
            Some(url) if !url.is_empty() => Ok(url),
            _ if !reply.status.eq_ignore_ascii_case("success") => Err(UploadError::Rejected {
                message: reply
                    .message
                    .unwrap_or_else(|| "unspecified image host failure".to_string()),
            }),
            _ => Err(UploadError::InvalidResponse {
                reason: "success reply without a URL".to_string(),
            }),
        }
    }
}
