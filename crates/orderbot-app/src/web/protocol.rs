use serde::{Deserialize, Serialize};

use orderbot_types::{SessionId, Turn};

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    SendMessage { content: String },
    RestartChat,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    SessionCreated {
        session_id: SessionId,
        created_at: String,
    },
    SessionJoined {
        session_id: SessionId,
        created_at: String,
        current_model: String,
        /// User and assistant turns so far; the system prompt is not sent
        history: Vec<Turn>,
    },
    AssistantMessage {
        content: String,
    },
    Error {
        message: String,
        recoverable: bool,
    },
}

/// Session information for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: String,
    pub last_activity: String,
    pub active_clients: usize,
    pub message_count: usize,
    pub started: bool,
    pub total_tokens_used: u64,
    pub current_model: String,
}

/// `GET /api/sessions/:id` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub info: SessionInfo,
    pub history: Vec<Turn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"SendMessage","data":{"content":"one cheese"}}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SendMessage {
                content: "one cheese".to_string()
            }
        );

        let restart: ClientMessage = serde_json::from_str(r#"{"type":"RestartChat"}"#).unwrap();
        assert_eq!(restart, ClientMessage::RestartChat);
    }

    #[test]
    fn test_server_message_wire_format() {
        let json = serde_json::to_value(ServerMessage::Error {
            message: "An error occurred: network error: reset".to_string(),
            recoverable: true,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "Error",
                "data": {
                    "message": "An error occurred: network error: reset",
                    "recoverable": true
                }
            })
        );
    }

    #[test]
    fn test_history_serializes_roles_lowercase() {
        let json = serde_json::to_value(ServerMessage::SessionJoined {
            session_id: uuid::Uuid::nil(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            current_model: "gpt-3.5-turbo".to_string(),
            history: vec![Turn::user("hi"), Turn::assistant("hello")],
        })
        .unwrap();

        assert_eq!(
            json["data"]["history"],
            serde_json::json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ])
        );
    }
}
