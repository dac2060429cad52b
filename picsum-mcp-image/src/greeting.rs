//! Greeting text used by the `welcome` and `farewell` prompts.

/// Builds greeting and farewell messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingService;

impl GreetingService {
    pub fn new() -> Self {
        Self
    }

    /// `"Hello, {name}! Welcome to the MCP Server."`
    pub fn generate_greeting(&self, name: &str) -> String {
        format!("Hello, {}! Welcome to the MCP Server.", name)
    }

    /// `"Goodbye, {name}! Thank you for using the MCP Server."`
    pub fn generate_farewell(&self, name: &str) -> String {
        format!("Goodbye, {}! Thank you for using the MCP Server.", name)
    }
}
