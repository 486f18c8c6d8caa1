use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use uuid::Uuid;

use orderbot_chat::{ChatChannel, ChatSession, Exchange, OrderBot};
use orderbot_logging::TranscriptLogger;
use orderbot_types::{Role, SessionId, Turn};

use crate::web::protocol::{ServerMessage, SessionDetails, SessionInfo};

/// A client connection to a session
#[derive(Debug)]
pub struct ClientConnection {
    pub client_id: Uuid,
    pub ws_sender: mpsc::UnboundedSender<ServerMessage>,
    pub joined_at: DateTime<Utc>,
}

/// Read-side copy of the chat state, refreshed after every start and
/// exchange so listing never waits on an in-flight completion.
#[derive(Debug, Clone)]
struct ChatSnapshot {
    history: Vec<Turn>,
    started: bool,
    message_count: usize,
    total_tokens_used: u64,
}

impl ChatSnapshot {
    fn of(chat: &ChatSession) -> Self {
        let conversation = chat.conversation();
        Self {
            history: conversation
                .iter()
                .filter(|turn| turn.role() != Role::System)
                .cloned()
                .collect(),
            started: chat.is_started(),
            message_count: conversation.exchange_turns(),
            total_tokens_used: chat.total_tokens_used(),
        }
    }
}

/// A chat session shared by every browser tab attached to it
pub struct Session {
    pub id: SessionId,
    pub chat: Mutex<ChatSession>,
    pub clients: RwLock<Vec<ClientConnection>>,
    pub created_at: DateTime<Utc>,
    pub last_activity: Mutex<DateTime<Utc>>,
    snapshot: RwLock<ChatSnapshot>,
    closed: watch::Sender<bool>,
}

impl Session {
    pub fn new(chat: ChatSession) -> Self {
        Self {
            id: chat.id(),
            snapshot: RwLock::new(ChatSnapshot::of(&chat)),
            chat: Mutex::new(chat),
            clients: RwLock::new(Vec::new()),
            created_at: Utc::now(),
            last_activity: Mutex::new(Utc::now()),
            closed: watch::channel(false).0,
        }
    }

    pub async fn add_client(&self, client_id: Uuid, ws_sender: mpsc::UnboundedSender<ServerMessage>) {
        let conn = ClientConnection {
            client_id,
            ws_sender,
            joined_at: Utc::now(),
        };
        self.clients.write().await.push(conn);
        self.update_activity().await;
    }

    pub async fn remove_client(&self, client_id: Uuid) {
        self.clients.write().await.retain(|c| c.client_id != client_id);
        self.update_activity().await;
    }

    pub async fn broadcast(&self, message: ServerMessage) {
        let clients = self.clients.read().await;
        for client in clients.iter() {
            let _ = client.ws_sender.send(message.clone());
        }
    }

    pub async fn send_to_client(&self, client_id: Uuid, message: ServerMessage) {
        let clients = self.clients.read().await;
        if let Some(client) = clients.iter().find(|c| c.client_id == client_id) {
            let _ = client.ws_sender.send(message);
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn update_activity(&self) {
        *self.last_activity.lock().await = Utc::now();
    }

    pub async fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.lock().await
    }

    /// Mark the session as gone from its manager. Attached sockets stop
    /// relaying once they see this.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolves once the session has been closed
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }

    async fn publish(&self, chat: &ChatSession) {
        *self.snapshot.write().await = ChatSnapshot::of(chat);
    }

    /// Greet attached clients unless the session already started. Returns
    /// whether the greeting was sent.
    pub async fn start_if_needed(&self, bot: &OrderBot) -> bool {
        if self.snapshot.read().await.started {
            return false;
        }
        let mut chat = self.chat.lock().await;
        if chat.is_started() {
            return false;
        }
        chat.start(bot, self).await;
        self.publish(&chat).await;
        drop(chat);
        self.update_activity().await;
        true
    }

    pub async fn restart(&self, bot: &OrderBot) {
        let mut chat = self.chat.lock().await;
        chat.start(bot, self).await;
        self.publish(&chat).await;
        drop(chat);
        self.update_activity().await;
    }

    /// Relay one user message. Messages for the same session are handled one
    /// at a time; other sessions are not blocked.
    pub async fn handle_message(&self, bot: &OrderBot, text: &str) -> Exchange {
        self.update_activity().await;
        let mut chat = self.chat.lock().await;
        let exchange = chat.handle(bot, text, self).await;
        self.publish(&chat).await;
        drop(chat);
        self.update_activity().await;
        exchange
    }

    /// User and assistant turns as of the last completed exchange
    pub async fn history(&self) -> Vec<Turn> {
        self.snapshot.read().await.history.clone()
    }

    pub async fn get_info(&self, current_model: &str) -> SessionInfo {
        let snapshot = self.snapshot.read().await.clone();
        let active_clients = self.client_count().await;
        let last_activity = self.last_activity().await;

        SessionInfo {
            id: self.id,
            created_at: self.created_at.to_rfc3339(),
            last_activity: last_activity.to_rfc3339(),
            active_clients,
            message_count: snapshot.message_count,
            started: snapshot.started,
            total_tokens_used: snapshot.total_tokens_used,
            current_model: current_model.to_string(),
        }
    }
}

/// Outbound side of the relay: every attached client sees every message.
#[async_trait]
impl ChatChannel for Session {
    async fn send_text(&self, text: &str) {
        self.broadcast(ServerMessage::AssistantMessage {
            content: text.to_string(),
        })
        .await;
    }

    async fn send_error(&self, text: &str) {
        self.broadcast(ServerMessage::Error {
            message: text.to_string(),
            recoverable: true,
        })
        .await;
    }
}

/// Manages all active sessions
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    bot: Arc<OrderBot>,
    log_dir: Option<PathBuf>,
}

impl SessionManager {
    pub fn new(bot: Arc<OrderBot>, log_dir: Option<PathBuf>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            bot,
            log_dir,
        }
    }

    pub fn bot(&self) -> &Arc<OrderBot> {
        &self.bot
    }

    /// Create a session. It greets on its first websocket attach.
    pub async fn create_session(&self) -> Arc<Session> {
        let session_id = Uuid::new_v4();
        let mut chat = ChatSession::new(session_id, &self.bot);

        if let Some(log_dir) = &self.log_dir {
            match TranscriptLogger::new(log_dir, session_id).await {
                Ok(transcript) => chat = chat.with_transcript(transcript),
                Err(e) => log::warn!("Transcript disabled for session {}: {:#}", session_id, e),
            }
        }

        let session = Arc::new(Session::new(chat));
        self.sessions.write().await.insert(session_id, session.clone());
        log::info!("Created session {}", session_id);

        session
    }

    /// Get a session by ID
    pub async fn get_session(&self, session_id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// List all active sessions, most recently active first
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(sessions.len());

        for session in sessions {
            infos.push(self.session_info(&session).await);
        }

        infos.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        infos
    }

    pub async fn session_info(&self, session: &Session) -> SessionInfo {
        session.get_info(self.bot.model()).await
    }

    pub async fn session_details(&self, session: &Session) -> SessionDetails {
        SessionDetails {
            info: self.session_info(session).await,
            history: session.history().await,
        }
    }

    /// Remove a session, telling attached clients it is gone. Returns false
    /// for an unknown id.
    pub async fn remove_session(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.close();
                session
                    .broadcast(ServerMessage::Error {
                        message: "Session closed".to_string(),
                        recoverable: false,
                    })
                    .await;
                log::info!("Closed session {}", session_id);
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions that have no clients and have been idle longer than
    /// `idle_timeout`. Returns how many were removed.
    pub async fn cleanup_inactive(&self, idle_timeout: Duration) -> usize {
        let cutoff = match chrono::Duration::from_std(idle_timeout) {
            Ok(timeout) => Utc::now() - timeout,
            Err(_) => return 0,
        };

        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut expired = Vec::new();
        for session in sessions {
            if Self::is_expired(&session, cutoff).await {
                expired.push(session.id);
            }
        }

        if expired.is_empty() {
            return 0;
        }

        // A client may have attached between the scan and here
        let mut map = self.sessions.write().await;
        let mut removed = 0;
        for id in &expired {
            let Some(session) = map.get(id).cloned() else {
                continue;
            };
            if !Self::is_expired(&session, cutoff).await {
                continue;
            }
            map.remove(id);
            session.close();
            log::info!("Evicted idle session {}", id);
            removed += 1;
        }
        removed
    }

    async fn is_expired(session: &Session, cutoff: DateTime<Utc>) -> bool {
        session.client_count().await == 0 && session.last_activity().await < cutoff
    }
}
