//! # orderbot-llm-api
//!
//! Client for the completion service that writes the order bot's replies.
//!
//! ## Features
//!
//! - **One seam**: the [`CompletionClient`] trait, so the relay can be driven
//!   by a fake in tests
//! - **OpenAI-compatible wire format**: works against OpenAI and any server
//!   exposing `/v1/chat/completions`
//! - **Tagged errors**: [`CompletionError`] separates network, auth, rate
//!   limit and malformed-response failures
//! - **Optional retries**: [`RetryPolicy`] with exponential backoff
//!
//! ## Example
//!
//! ```rust,no_run
//! use orderbot_llm_api::{ClientFactory, ClientSettings, CompletionClient};
//! use orderbot_types::Conversation;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ClientFactory::create(&ClientSettings::from_env());
//!
//!     let mut conversation = Conversation::new("You are OrderBot.");
//!     conversation.push_user("One cheese pizza, please");
//!
//!     match client.complete(conversation.turns()).await {
//!         Ok(completion) => println!("{}", completion.content),
//!         Err(e) => eprintln!("An error occurred: {}", e),
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::{openai::OpenAiClient, ChatMessage, Completion, CompletionClient, TokenUsage};
pub use config::{
    normalize_api_url, ClientFactory, ClientSettings, API_KEY_ENV, DEFAULT_MODEL, OPENAI_API_URL,
};
pub use error::CompletionError;
pub use retry::{complete_with_retry, RetryPolicy};
