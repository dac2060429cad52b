//! MCP Server implementation for the Picsum image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `image` tool for generating, downloading, listing and describing images
//! - `greeting`, `welcome` and `farewell` prompts

use crate::greeting::GreetingService;
use crate::handler::{ImageHandler, ImageOutput, ImageParams};
use crate::prompts::{self, NAME_ARGUMENT, PromptKind};
use picsum_mcp_common::config::Config;
use picsum_mcp_common::error::Error;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, GetPromptResult, Implementation, JsonObject, ListPromptsResult,
        ListToolsResult, PromptMessage, PromptMessageRole, ServerCapabilities, ServerInfo, Tool,
    },
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the single tool this server exposes.
pub const IMAGE_TOOL: &str = "image";

/// Description advertised for the `image` tool.
pub const IMAGE_TOOL_DESCRIPTION: &str =
    "Generate or fetch images from picsum.photos with various options";

/// MCP Server for Picsum images.
#[derive(Clone, Debug)]
pub struct PicsumServer {
    handler: Arc<ImageHandler>,
    greetings: GreetingService,
}

impl PicsumServer {
    /// Create a server backed by the real provider client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        Ok(Self::with_handler(ImageHandler::new(config)?))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            greetings: GreetingService::new(),
        }
    }

    /// Tool definitions for `tools/list`.
    pub fn tools() -> Vec<Tool> {
        let schema = schemars::schema_for!(ImageParams);
        let input_schema = match serde_json::to_value(&schema).unwrap_or_default() {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        vec![Tool {
            name: Cow::Borrowed(IMAGE_TOOL),
            description: Some(Cow::Borrowed(IMAGE_TOOL_DESCRIPTION)),
            input_schema,
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        }]
    }

    /// Run the `image` tool with raw call arguments.
    ///
    /// Missing arguments are treated as an empty object.
    pub async fn call_image(
        &self,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = serde_json::Value::Object(arguments.unwrap_or_default());
        let params: ImageParams = serde_json::from_value(arguments)
            .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?;
        self.image(params).await
    }

    /// Run the `image` tool with typed parameters.
    pub async fn image(&self, params: ImageParams) -> Result<CallToolResult, McpError> {
        if let Err(errors) = params.validate() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(to_mcp_error(Error::validation(message)));
        }

        let output = self.handler.execute(params).await.map_err(to_mcp_error)?;

        let content = match output {
            ImageOutput::Url(url) => Content::text(url),
            ImageOutput::Text(text) => Content::text(text),
            ImageOutput::Image(image) => Content::image(image.data, image.mime_type),
        };
        Ok(CallToolResult::success(vec![content]))
    }

    /// Render a prompt by name.
    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        let kind = PromptKind::from_name(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown prompt: {}", name), None))?;

        let user = arguments
            .and_then(|args| args.get(NAME_ARGUMENT))
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!("Missing required argument '{}' for prompt '{}'", NAME_ARGUMENT, name),
                    None,
                )
            })?;

        Ok(GetPromptResult {
            description: Some(kind.description().to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                kind.render(&self.greetings, user),
            )],
        })
    }
}

/// Caller mistakes surface as `invalid_params`, everything else as `internal_error`.
fn to_mcp_error(err: Error) -> McpError {
    if err.is_caller_error() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        warn!(error = %err, "image tool failed");
        McpError::internal_error(err.to_string(), None)
    }
}

impl ServerHandler for PicsumServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image server for picsum.photos. \
                 Use the image tool to build image URLs, download images, \
                 list available images or fetch image metadata."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                IMAGE_TOOL => {
                    info!("Handling image tool call");
                    self.call_image(params.arguments).await
                }
                _ => Err(McpError::invalid_params(format!("Unknown tool: {}", params.name), None)),
            }
        }
    }

    fn list_prompts(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing prompts");
            Ok(ListPromptsResult {
                prompts: prompts::definitions(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn get_prompt(
        &self,
        params: rmcp::model::GetPromptRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        async move {
            debug!(prompt = %params.name, "Rendering prompt");
            self.prompt(&params.name, params.arguments.as_ref())
        }
    }
}
