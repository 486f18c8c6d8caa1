use std::sync::Arc;

use orderbot_llm_api::{complete_with_retry, CompletionClient, CompletionError, RetryPolicy, TokenUsage};
use orderbot_types::Conversation;

use crate::channel::ChatChannel;
use crate::prompt::PromptConfig;

/// Result of one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// The assistant answered; the reply was appended and sent
    Replied {
        content: String,
        usage: Option<TokenUsage>,
    },
    /// The completion call failed; only the user turn was appended
    Failed(CompletionError),
}

impl Exchange {
    pub fn is_success(&self) -> bool {
        matches!(self, Exchange::Replied { .. })
    }
}

/// The order bot: greets new sessions and relays messages to the completion service.
///
/// It holds no conversation state of its own; every call works on the
/// [`Conversation`] the host passes in, so one `OrderBot` serves any number
/// of sessions.
pub struct OrderBot {
    client: Arc<dyn CompletionClient>,
    prompt: PromptConfig,
    retry: RetryPolicy,
}

impl OrderBot {
    pub fn new(client: Arc<dyn CompletionClient>, prompt: PromptConfig) -> Self {
        Self {
            client,
            prompt,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn prompt(&self) -> &PromptConfig {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// A conversation holding only the system instruction, without greeting anyone.
    pub fn new_conversation(&self) -> Conversation {
        Conversation::new(self.prompt.system_prompt.clone())
    }

    /// "Chat started": fresh conversation plus the greeting.
    pub async fn on_session_start(&self, channel: &dyn ChatChannel) -> Conversation {
        let conversation = self.new_conversation();
        channel.send_text(&self.prompt.greeting).await;
        conversation
    }

    /// "Message received": append the user turn, ask the completion service,
    /// and on success append and send the assistant turn.
    ///
    /// Failures are reported to `channel` and never returned as `Err`; the
    /// user turn stays in the conversation and no assistant turn is added.
    pub async fn on_message(
        &self,
        conversation: &mut Conversation,
        text: &str,
        channel: &dyn ChatChannel,
    ) -> Exchange {
        conversation.push_user(text);

        match complete_with_retry(self.client.as_ref(), conversation.turns(), &self.retry).await {
            Ok(completion) => {
                conversation.push_assistant(completion.content.clone());
                channel.send_text(&completion.content).await;
                Exchange::Replied {
                    content: completion.content,
                    usage: completion.usage,
                }
            }
            Err(err) => {
                log::warn!("Completion failed ({}): {}", err.kind(), err);
                channel.send_error(&self.format_error(&err)).await;
                Exchange::Failed(err)
            }
        }
    }

    /// User-visible text for a failed exchange
    pub fn format_error(&self, err: &CompletionError) -> String {
        format!("{}{}", self.prompt.error_prefix, err)
    }
}
