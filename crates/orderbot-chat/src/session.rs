use orderbot_logging::TranscriptLogger;
use orderbot_types::{Conversation, SessionId, Turn};

use crate::channel::ChatChannel;
use crate::relay::{Exchange, OrderBot};

/// Per-session state: one conversation and, optionally, its transcript.
///
/// Hosts keep one `ChatSession` per user and serialize access to it, which
/// is what keeps concurrent users from seeing each other's history.
pub struct ChatSession {
    id: SessionId,
    conversation: Conversation,
    transcript: Option<TranscriptLogger>,
    started: bool,
    total_tokens_used: u64,
}

impl ChatSession {
    /// A session that has not greeted anyone yet.
    pub fn new(id: SessionId, bot: &OrderBot) -> Self {
        Self {
            id,
            conversation: bot.new_conversation(),
            transcript: None,
            started: false,
            total_tokens_used: 0,
        }
    }

    pub fn with_transcript(mut self, transcript: TranscriptLogger) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn total_tokens_used(&self) -> u64 {
        self.total_tokens_used
    }

    /// Reset to the system turn and greet. Also used for "restart chat".
    pub async fn start(&mut self, bot: &OrderBot, channel: &dyn ChatChannel) {
        self.conversation = bot.on_session_start(channel).await;
        self.started = true;
        log::info!("Session {} started", self.id);

        let system_turn = self.conversation.system_turn().clone();
        self.record(&[system_turn]).await;
    }

    /// Relay one user message.
    pub async fn handle(&mut self, bot: &OrderBot, text: &str, channel: &dyn ChatChannel) -> Exchange {
        let before = self.conversation.len();
        let exchange = bot.on_message(&mut self.conversation, text, channel).await;

        if let Exchange::Replied { usage: Some(usage), .. } = &exchange {
            self.total_tokens_used += u64::from(usage.total_tokens);
        }
        log::debug!(
            "Session {}: exchange {} ({} turns)",
            self.id,
            if exchange.is_success() { "replied" } else { "failed" },
            self.conversation.len()
        );

        let new_turns = self.conversation.turns()[before..].to_vec();
        self.record(&new_turns).await;

        exchange
    }

    async fn record(&mut self, turns: &[Turn]) {
        if let Some(transcript) = self.transcript.as_mut() {
            for turn in turns {
                transcript.log_turn(turn).await;
            }
        }
    }
}
