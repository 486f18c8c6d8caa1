//! Core types and structures for orderbot
//!
//! This crate provides the conversation model shared by every orderbot crate:
//! the speaker [`Role`], the immutable [`Turn`], and the append-only
//! [`Conversation`] that is replayed to the completion service on each call.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Session identifier issued by the hosting layer
pub type SessionId = Uuid;

// ============================================================================
// Roles
// ============================================================================

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Turns
// ============================================================================

/// One message exchanged in the conversation
///
/// Fields are private so a turn cannot be edited after it has been recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

// ============================================================================
// Conversation
// ============================================================================

/// Ordered history of turns for one session.
///
/// The first element is always the system turn supplied to [`Conversation::new`].
/// Turns can only be appended through [`Conversation::push_user`] and
/// [`Conversation::push_assistant`]; nothing removes or rewrites a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation seeded with the system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::user(content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::assistant(content))
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        // just pushed, never empty
        &self.turns[self.turns.len() - 1]
    }

    pub fn system_turn(&self) -> &Turn {
        &self.turns[0]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> &Turn {
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Number of turns after the system instruction.
    pub fn exchange_turns(&self) -> usize {
        self.turns.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_conversation_holds_only_system_turn() {
        let conversation = Conversation::new("You are OrderBot");

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.exchange_turns(), 0);
        assert_eq!(conversation.system_turn(), &Turn::system("You are OrderBot"));
    }

    #[test]
    fn test_turns_keep_insertion_order() {
        let mut conversation = Conversation::new("sys");
        conversation.push_user("one");
        conversation.push_assistant("two");
        conversation.push_user("three");

        let roles: Vec<Role> = conversation.iter().map(|t| t.role()).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(conversation.last().content(), "three");
    }

    #[test]
    fn test_system_turn_survives_appends() {
        let mut conversation = Conversation::new("menu");
        for i in 0..10 {
            conversation.push_user(format!("user {}", i));
            conversation.push_assistant(format!("assistant {}", i));
        }

        assert_eq!(conversation.system_turn().content(), "menu");
        assert_eq!(
            conversation
                .iter()
                .filter(|t| t.role() == Role::System)
                .count(),
            1
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
    }

    #[test]
    fn test_conversation_serializes_as_turn_list() {
        let mut conversation = Conversation::new("sys");
        conversation.push_user("ขอพิซซ่า");

        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["turns"][1]["content"], "ขอพิซซ่า");
        assert_eq!(json["turns"].as_array().map(|a| a.len()), Some(2));
    }
}
