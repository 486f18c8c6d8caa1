use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use orderbot_types::{Role, Turn};

use crate::error::Result;

pub mod openai;

/// Chat message structure (OpenAI-compatible format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().to_string(),
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The assistant text picked from a completion response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Completion service - the external model that writes the assistant's replies
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full conversation, in order, and return the first choice.
    async fn complete(&self, turns: &[Turn]) -> Result<Completion>;

    /// Model identifier sent with every request
    fn model(&self) -> &str;
}
