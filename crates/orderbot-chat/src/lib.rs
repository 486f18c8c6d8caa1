//! Order-taking relay between a chat UI and the completion service
//!
//! [`OrderBot`] implements the two entry points a hosting UI calls:
//! [`OrderBot::on_session_start`] when a chat opens and
//! [`OrderBot::on_message`] for every inbound message. Replies go out through
//! a host-provided [`ChatChannel`]. [`ChatSession`] bundles a conversation
//! with its bookkeeping for hosts that manage many users.

pub mod channel;
pub mod prompt;
pub mod relay;
pub mod session;


pub use channel::ChatChannel;
pub use prompt::{PromptConfig, DEFAULT_PROMPT_TOML};
pub use relay::{Exchange, OrderBot};
pub use session::ChatSession;
