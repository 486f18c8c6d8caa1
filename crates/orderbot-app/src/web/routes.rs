use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use orderbot_types::SessionId;

use crate::web::{
    protocol::{ClientMessage, ServerMessage, SessionDetails},
    session_manager::{Session, SessionManager},
};

const SEND_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // API routes
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session_details).delete(close_session),
        )
        // WebSocket endpoints
        .route("/ws", get(new_session_websocket))
        .route("/ws/:session_id", get(websocket_handler))
        // Chat page
        .route("/", get(serve_index))
        .with_state(state)
}

/// GET /api/sessions - List all active sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.session_manager.list_sessions().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// POST /api/sessions - Create a session that greets on its first attach
async fn create_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session = state.session_manager.create_session().await;

    Json(serde_json::json!({
        "session_id": session.id,
        "created_at": session.created_at.to_rfc3339(),
        "websocket_url": format!("/ws/{}", session.id),
    }))
}

/// GET /api/sessions/:id - Session info plus history
async fn get_session_details(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionDetails>, AppError> {
    let session = state
        .session_manager
        .get_session(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    Ok(Json(state.session_manager.session_details(&session).await))
}

/// DELETE /api/sessions/:id - Close a session
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.session_manager.remove_session(&id).await {
        return Err(AppError::NotFound("Session not found".into()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Session closed successfully",
    })))
}

/// GET /ws - New session over a WebSocket
async fn new_session_websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        let session = state.session_manager.create_session().await;
        handle_websocket(socket, state, session, true).await;
    })
}

/// GET /ws/:session_id - Attach to an existing session
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Response, AppError> {
    let session = state
        .session_manager
        .get_session(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    Ok(ws.on_upgrade(move |socket| handle_websocket(socket, state, session, false)))
}

/// Handle WebSocket connection
async fn handle_websocket(socket: WebSocket, state: AppState, session: Arc<Session>, created: bool) {
    let client_id = Uuid::new_v4();
    let bot = state.session_manager.bot().clone();

    // Create channel for sending messages to this client
    let (ws_sender, mut ws_receiver) = mpsc::unbounded_channel();
    session.add_client(client_id, ws_sender).await;

    // Removed between lookup and upgrade
    if session.is_closed() {
        session.remove_client(client_id).await;
        let msg = ServerMessage::Error {
            message: "Session closed".to_string(),
            recoverable: false,
        };
        if let Ok(json) = serde_json::to_string(&msg) {
            let mut socket = socket;
            let _ = socket.send(WsMessage::Text(json)).await;
        }
        return;
    }

    if created {
        // Greeting goes out first, then the id the page needs to reattach
        session.start_if_needed(&bot).await;
        session
            .send_to_client(
                client_id,
                ServerMessage::SessionCreated {
                    session_id: session.id,
                    created_at: session.created_at.to_rfc3339(),
                },
            )
            .await;
    } else {
        let join_msg = ServerMessage::SessionJoined {
            session_id: session.id,
            created_at: session.created_at.to_rfc3339(),
            current_model: bot.model().to_string(),
            history: session.history().await,
        };
        session.send_to_client(client_id, join_msg).await;
        session.start_if_needed(&bot).await;
    }

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Spawn task to send messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sink.send(WsMessage::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => log::error!("Failed to encode server message: {}", e),
            }
        }
    });

    // Messages from one socket are relayed in arrival order. A closed
    // session stops relaying even while the socket is idle.
    loop {
        let msg = tokio::select! {
            _ = session.closed() => break,
            msg = ws_stream.next() => msg,
        };
        let Some(Ok(msg)) = msg else {
            break;
        };
        if session.is_closed() {
            break;
        }
        match msg {
            WsMessage::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::SendMessage { content }) => {
                    session.handle_message(&bot, &content).await;
                }
                Ok(ClientMessage::RestartChat) => {
                    session.restart(&bot).await;
                }
                Err(e) => {
                    log::warn!("Session {}: unparsable client message: {}", session.id, e);
                    session
                        .send_to_client(
                            client_id,
                            ServerMessage::Error {
                                message: format!("Invalid message: {}", e),
                                recoverable: true,
                            },
                        )
                        .await;
                }
            },
            WsMessage::Close(_) => break,
            _ => {}
        }
    }

    // Dropping our sender lets the send task flush what is queued and stop
    session.remove_client(client_id).await;
    if tokio::time::timeout(SEND_DRAIN_TIMEOUT, send_task).await.is_err() {
        log::debug!("Client {} send task still draining", client_id);
    }
    log::debug!("Client {} left session {}", client_id, session.id);
}

/// GET / - Serve the chat page
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

/// Error handling
#[derive(Debug)]
enum AppError {
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
