use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Prompt shipped with the binary: the pizza shop persona and menu.
pub const DEFAULT_PROMPT_TOML: &str = include_str!("../prompts/orderbot.toml");

fn default_error_prefix() -> String {
    "An error occurred: ".to_string()
}

/// Business content the bot is configured with.
///
/// The menu and prices live inside `system_prompt`; the bot never parses
/// them, it only forwards them to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptConfig {
    /// First turn of every conversation
    pub system_prompt: String,
    /// Sent to the user when a session starts
    pub greeting: String,
    /// Prepended to the error text shown when a completion call fails
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,
}

impl PromptConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse prompt configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid prompt file {}", path.display()))
    }

    /// Load `path` when given, otherwise the embedded default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_toml_str(DEFAULT_PROMPT_TOML),
        }
    }
}
