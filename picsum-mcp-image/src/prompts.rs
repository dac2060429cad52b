//! MCP prompts offered by the server.
//!
//! - `greeting` - open a conversation with a named user
//! - `welcome` - welcome message from [`GreetingService`]
//! - `farewell` - closing message from [`GreetingService`]
//!
//! Every prompt takes a single required `name` argument.

use crate::greeting::GreetingService;
use rmcp::model::{Prompt, PromptArgument};

/// Name of the argument every prompt requires.
pub const NAME_ARGUMENT: &str = "name";

/// The prompts this server can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Greeting,
    Welcome,
    Farewell,
}

impl PromptKind {
    /// All prompts in listing order.
    pub const ALL: [PromptKind; 3] =
        [PromptKind::Greeting, PromptKind::Welcome, PromptKind::Farewell];

    /// Look up a prompt by its protocol name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PromptKind::Greeting => "greeting",
            PromptKind::Welcome => "welcome",
            PromptKind::Farewell => "farewell",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PromptKind::Greeting => "A simple greeting prompt",
            PromptKind::Welcome => "A welcome message for new users",
            PromptKind::Farewell => "A farewell message for departing users",
        }
    }

    fn argument_description(&self) -> &'static str {
        match self {
            PromptKind::Greeting => "Name to greet",
            PromptKind::Welcome => "Name of the user to welcome",
            PromptKind::Farewell => "Name of the user saying goodbye",
        }
    }

    /// Render the user message for `name`.
    pub fn render(&self, greetings: &GreetingService, name: &str) -> String {
        match self {
            PromptKind::Greeting => format!("Hello, {}! How can I help you today?", name),
            PromptKind::Welcome => greetings.generate_greeting(name),
            PromptKind::Farewell => greetings.generate_farewell(name),
        }
    }

    /// Protocol definition used by `prompts/list`.
    pub fn definition(&self) -> Prompt {
        let argument = PromptArgument {
            name: NAME_ARGUMENT.to_string(),
            title: None,
            description: Some(self.argument_description().to_string()),
            required: Some(true),
        };
        Prompt::new(self.name(), Some(self.description()), Some(vec![argument]))
    }
}

/// Definitions of every prompt, in listing order.
pub fn definitions() -> Vec<Prompt> {
    PromptKind::ALL.iter().map(PromptKind::definition).collect()
}
