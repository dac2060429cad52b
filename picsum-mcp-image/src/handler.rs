//! Image request handler for the Picsum MCP server.
//!
//! The flat `image` tool parameters are resolved into one of four requests
//! ([`ImageRequest`]) and executed against the provider:
//!
//! 1. `list` set: page through the provider catalogue
//! 2. `info` set: metadata for an `id`, or locally synthesized metadata for a `seed`
//! 3. otherwise: build an image URL and either return it or download the image
//!
//! The precedence is fixed: `list` wins over `info`, which wins over generation.
//! Fields that do not belong to the selected request are ignored.

use std::sync::Arc;

use picsum_mcp_common::config::Config;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use picsum_mcp_common::error::{Error, RemoteOperation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::client::{
    Base64ImageWrapper, HttpClient, HttpResponse, ImagePayload, ImageWrapper, ReqwestClient,
};

/// Smallest accepted blur radius.
pub const MIN_BLUR: u64 = 1;

/// Largest accepted blur radius.
pub const MAX_BLUR: u64 = 10;

/// Edge length used when no width is given.
pub const DEFAULT_SIZE: u64 = 200;

/// Message for blur values outside `MIN_BLUR..=MAX_BLUR`.
pub const BLUR_RANGE_MESSAGE: &str = "Blur value must be between 1 and 10";

/// Message for an `info` request carrying neither `id` nor `seed`.
pub const INFO_TARGET_MESSAGE: &str = "Info operation requires either --id or --seed parameter";

/// Explanation attached to seed-based info results.
pub const SEED_INFO_MESSAGE: &str =
    "This is info for a seed-based image. Seed-based images use deterministic generation.";

/// Characters left unescaped in the seed query value.
const SEED_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Image encoding requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Webp,
}

impl ImageFormat {
    /// Value of the `fmt` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Return shape of the generation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Return the constructed URL as a string
    #[default]
    Url,
    /// Download the image and return it as binary content
    File,
}

/// Parameters of the `image` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ImageParams {
    /// The width of the image in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub width: Option<u64>,

    /// The height of the image in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub height: Option<u64>,

    /// The ID of a specific image to retrieve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// A seed for generating a static random image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,

    /// Apply grayscale filter to the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<bool>,

    /// Apply blur filter (1-10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 10))]
    pub blur: Option<u64>,

    /// Image format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,

    /// Output type: url returns string URL, file returns binary data
    #[serde(default)]
    pub output: OutputKind,

    /// Fetch list of available images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,

    /// Page number for list results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub page: Option<u64>,

    /// Number of results per page for list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub limit: Option<u64>,

    /// Fetch metadata for a specific image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<bool>,
}

/// Validation error details for image parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ImageParams {
    /// Schema-level validation performed by the host before execution.
    ///
    /// Checks that sizes and paging values are positive and blur is within
    /// range. Cross-field rules (e.g. `info` needing a target) are left to
    /// [`ImageRequest::try_from`].
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("page", self.page),
            ("limit", self.limit),
        ];
        for (field, value) in positive {
            if value == Some(0) {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: format!("{} must be a positive integer", field),
                });
            }
        }

        if let Some(blur) = self.blur {
            if !(MIN_BLUR..=MAX_BLUR).contains(&blur) {
                errors.push(ValidationError {
                    field: "blur".to_string(),
                    message: BLUR_RANGE_MESSAGE.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Everything that shapes a constructed image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSpec {
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub id: Option<String>,
    pub seed: Option<String>,
    pub grayscale: bool,
    pub blur: Option<u64>,
    pub format: Option<ImageFormat>,
}

impl ImageSpec {
    /// Path component, e.g. `/id/870/200/300` or `/200`.
    ///
    /// Height is only emitted after a width; with neither an id nor a width
    /// the default square `/200` is used.
    pub fn path(&self) -> String {
        let mut path = String::new();
        if let Some(id) = &self.id {
            path.push_str("/id/");
            path.push_str(id);
        }

        match (self.width, self.height) {
            (Some(width), Some(height)) => path.push_str(&format!("/{}/{}", width, height)),
            (Some(width), None) => path.push_str(&format!("/{}", width)),
            (None, _) if self.id.is_none() => path.push_str(&format!("/{}", DEFAULT_SIZE)),
            (None, _) => {}
        }
        path
    }

    /// Query string including the leading `?`, or empty.
    ///
    /// Parameter order is always seed, grayscale, blur, fmt.
    pub fn query(&self) -> String {
        let mut params = Vec::new();
        if let Some(seed) = &self.seed {
            params.push(format!("seed={}", utf8_percent_encode(seed, SEED_SET)));
        }
        if self.grayscale {
            params.push("grayscale".to_string());
        }
        if let Some(blur) = self.blur {
            params.push(format!("blur={}", blur));
        }
        if let Some(format) = self.format {
            params.push(format!("fmt={}", format.as_str()));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }

    /// Full image URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}{}", base_url, self.path(), self.query())
    }
}

/// A resolved `image` tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRequest {
    /// Page through the provider catalogue.
    List { page: Option<u64>, limit: Option<u64> },
    /// Provider metadata for one image.
    InfoById { id: String },
    /// Locally derived metadata for a seeded image.
    InfoBySeed {
        seed: String,
        width: Option<u64>,
        height: Option<u64>,
    },
    /// Construct an image URL, optionally downloading it.
    Generate { spec: ImageSpec, output: OutputKind },
}

impl ImageRequest {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageRequest::List { .. } => "list",
            ImageRequest::InfoById { .. } => "info_by_id",
            ImageRequest::InfoBySeed { .. } => "info_by_seed",
            ImageRequest::Generate { output: OutputKind::Url, .. } => "generate_url",
            ImageRequest::Generate { output: OutputKind::File, .. } => "generate_file",
        }
    }
}

/// Empty strings count as absent, like an unset field.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl TryFrom<ImageParams> for ImageRequest {
    type Error = Error;

    fn try_from(params: ImageParams) -> Result<Self, Error> {
        let id = non_empty(params.id);
        let seed = non_empty(params.seed);

        if params.list.unwrap_or(false) {
            return Ok(ImageRequest::List {
                page: params.page,
                limit: params.limit,
            });
        }

        if params.info.unwrap_or(false) {
            return match (id, seed) {
                (Some(id), _) => Ok(ImageRequest::InfoById { id }),
                (None, Some(seed)) => Ok(ImageRequest::InfoBySeed {
                    seed,
                    width: params.width,
                    height: params.height,
                }),
                (None, None) => Err(Error::invalid_argument(INFO_TARGET_MESSAGE)),
            };
        }

        if let Some(blur) = params.blur {
            if !(MIN_BLUR..=MAX_BLUR).contains(&blur) {
                return Err(Error::invalid_argument(BLUR_RANGE_MESSAGE));
            }
        }

        Ok(ImageRequest::Generate {
            spec: ImageSpec {
                width: params.width,
                height: params.height,
                id,
                seed,
                grayscale: params.grayscale.unwrap_or(false),
                blur: params.blur,
                format: params.format,
            },
            output: params.output,
        })
    }
}

/// Metadata synthesized for a seed-based image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedInfo {
    pub seed: String,
    pub url: String,
    pub width: u64,
    pub height: u64,
    pub message: String,
}

/// Result of an `image` tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutput {
    /// Bare image URL
    Url(String),
    /// Pretty-printed JSON (list, info)
    Text(String),
    /// Downloaded image
    Image(ImagePayload),
}

/// Image request handler.
///
/// Stateless apart from configuration; every call is an independent request.
#[derive(Clone)]
pub struct ImageHandler {
    /// Application configuration.
    pub config: Config,
    client: Arc<dyn HttpClient>,
    wrapper: Arc<dyn ImageWrapper>,
}

impl std::fmt::Debug for ImageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageHandler {
    /// Create a handler talking to the configured provider over `reqwest`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = ReqwestClient::new(&config)?;
        Ok(Self::with_deps(config, Arc::new(client), Arc::new(Base64ImageWrapper)))
    }

    /// Create a handler with explicit capabilities.
    pub fn with_deps(
        config: Config,
        client: Arc<dyn HttpClient>,
        wrapper: Arc<dyn ImageWrapper>,
    ) -> Self {
        Self {
            config,
            client,
            wrapper,
        }
    }

    /// Resolve and execute one `image` tool call.
    pub async fn execute(&self, params: ImageParams) -> Result<ImageOutput, Error> {
        let request = ImageRequest::try_from(params)?;
        self.execute_request(request).await
    }

    /// Execute an already resolved request.
    #[instrument(
        level = "info",
        name = "image_request",
        skip(self, request),
        fields(kind = request.kind())
    )]
    pub async fn execute_request(&self, request: ImageRequest) -> Result<ImageOutput, Error> {
        match request {
            ImageRequest::List { page, limit } => {
                let list = self.fetch_image_list(page, limit).await?;
                Ok(ImageOutput::Text(to_pretty_json(&list)?))
            }
            ImageRequest::InfoById { id } => {
                let image_info = self.fetch_image_info(&id).await?;
                Ok(ImageOutput::Text(to_pretty_json(&image_info)?))
            }
            ImageRequest::InfoBySeed { seed, width, height } => {
                let seed_info = self.seed_info(&seed, width, height);
                Ok(ImageOutput::Text(to_pretty_json(&seed_info)?))
            }
            ImageRequest::Generate { spec, output } => {
                let url = spec.url(&self.config.base_url);
                match output {
                    OutputKind::Url => Ok(ImageOutput::Url(url)),
                    OutputKind::File => Ok(ImageOutput::Image(self.fetch_image_file(&url).await?)),
                }
            }
        }
    }

    /// `{api}/list[?page=P&limit=L]`.
    pub fn list_url(&self, page: Option<u64>, limit: Option<u64>) -> String {
        let mut params = Vec::new();
        if let Some(page) = page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }

        let mut url = format!("{}/list", self.config.api_url);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// `{api}/images/{id}`.
    pub fn info_url(&self, id: &str) -> String {
        format!("{}/images/{}", self.config.api_url, id)
    }

    /// Fetch one page of the provider catalogue, unmodified.
    pub async fn fetch_image_list(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.list_url(page, limit);
        self.get_json(RemoteOperation::List, &url).await
    }

    /// Fetch provider metadata for one image, unmodified.
    pub async fn fetch_image_info(&self, id: &str) -> Result<serde_json::Value, Error> {
        let url = self.info_url(id);
        self.get_json(RemoteOperation::Info, &url).await
    }

    /// Describe a seeded image without contacting the provider.
    ///
    /// Width defaults to 200 and height to the width.
    pub fn seed_info(&self, seed: &str, width: Option<u64>, height: Option<u64>) -> SeedInfo {
        let spec = ImageSpec {
            width,
            height,
            seed: Some(seed.to_string()),
            ..Default::default()
        };
        let resolved_width = width.unwrap_or(DEFAULT_SIZE);

        SeedInfo {
            seed: seed.to_string(),
            url: spec.url(&self.config.base_url),
            width: resolved_width,
            height: height.unwrap_or(resolved_width),
            message: SEED_INFO_MESSAGE.to_string(),
        }
    }

    /// Download the image behind `url` and wrap it as binary content.
    pub async fn fetch_image_file(&self, url: &str) -> Result<ImagePayload, Error> {
        let response = self.send(RemoteOperation::Fetch, url).await?;
        info!(bytes = response.body.len(), "Downloaded image");
        self.wrapper
            .wrap(&response.body, response.content_type.as_deref())
    }

    async fn get_json(
        &self,
        operation: RemoteOperation,
        url: &str,
    ) -> Result<serde_json::Value, Error> {
        let response = self.send(operation, url).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| Error::transport(operation, e.to_string()))
    }

    /// One round trip; non-2xx becomes `Error::Remote`, no response at all `Error::Transport`.
    async fn send(&self, operation: RemoteOperation, url: &str) -> Result<HttpResponse, Error> {
        debug!(%operation, url = %url, "Calling provider");

        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| Error::transport(operation, format!("{:#}", e)))?;

        if !response.is_success() {
            return Err(Error::remote(operation, response.status, response.status_text));
        }
        Ok(response)
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
