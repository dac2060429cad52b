//! Workspace-level integration tests for the Picsum MCP server.
//!
//! These tests verify:
//! - The server starts and advertises tools and prompts
//! - Tool registration and schema generation
//! - Property-based tests for tool schema validity, input validation, and output format

pub mod server_startup;
pub mod tool_schema;
pub mod output_format;
