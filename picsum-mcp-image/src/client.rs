//! Provider-facing capabilities injected into the image handler.
//!
//! - [`HttpClient`]: one `GET` round trip against the provider
//! - [`ImageWrapper`]: turns fetched bytes into the protocol's image payload
//!
//! Production implementations are [`ReqwestClient`] and [`Base64ImageWrapper`];
//! tests substitute in-memory doubles.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use picsum_mcp_common::config::Config;
use picsum_mcp_common::error::{Error, RemoteOperation};
use tracing::{debug, instrument};

/// MIME type reported when neither the bytes nor the response headers identify the image.
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// A completed provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase (e.g. "Not Found")
    pub status_text: String,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Build a `200 OK` JSON response.
    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            content_type: Some("application/json".to_string()),
            body: value.to_string().into_bytes(),
        }
    }

    /// Build a bodiless response with the given status.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            content_type: None,
            body: Vec::new(),
        }
    }
}

/// HTTP capability used for every provider call.
///
/// Implementations follow redirects; the provider answers image URLs with a
/// redirect to the CDN copy.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a single `GET` and return the response, whatever its status.
    ///
    /// Errors are reserved for failures to obtain a response at all
    /// (DNS, connect, timeout, truncated body).
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client honoring the configured request timeout.
    ///
    /// # Errors
    /// Returns `Error::Internal` if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    #[instrument(level = "debug", name = "provider_get", skip(self))]
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        debug!(status = status.as_u16(), bytes = body.len(), "Provider responded");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

/// Structured binary image payload (`{type: "image", data, mimeType}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64-encoded image data
    pub data: String,
    /// MIME type of the image
    pub mime_type: String,
}

/// Capability that wraps fetched bytes as an image payload.
pub trait ImageWrapper: Send + Sync {
    /// Wrap `bytes`; `content_type` is the response header, if any.
    fn wrap(&self, bytes: &[u8], content_type: Option<&str>) -> Result<ImagePayload, Error>;
}

/// [`ImageWrapper`] producing base64 data with a sniffed MIME type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64ImageWrapper;

impl Base64ImageWrapper {
    /// Resolve the MIME type: magic bytes first, then an `image/*` header, then JPEG.
    pub fn mime_type(bytes: &[u8], content_type: Option<&str>) -> String {
        let sniffed = infer::get(bytes).filter(|k| k.matcher_type() == infer::MatcherType::Image);
        if let Some(kind) = sniffed {
            return kind.mime_type().to_string();
        }

        content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
    }
}

impl ImageWrapper for Base64ImageWrapper {
    fn wrap(&self, bytes: &[u8], content_type: Option<&str>) -> Result<ImagePayload, Error> {
        if bytes.is_empty() {
            return Err(Error::transport(RemoteOperation::Fetch, "Image response body is empty"));
        }

        Ok(ImagePayload {
            data: BASE64.encode(bytes),
            mime_type: Self::mime_type(bytes, content_type),
        })
    }
}
