use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::UserRef;
use crate::rooms::SessionHandle;
use crate::state::AppState;
use crate::ws::events::ClientEvent;
use crate::ws::{chat, project, whiteboard};

/// Optional identity handed over at connection time. Authorization is an
/// upstream concern; absent identity means an anonymous session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, query, state))
}

/// Handle one WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, query: WsQuery, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let user = query.user_id.map(|id| UserRef {
        id,
        name: query.user_name.unwrap_or_else(|| "Anonymous".to_string()),
    });

    info!(
        "WebSocket connection established: connection_id={} user={:?}",
        connection_id,
        user.as_ref().map(|u| u.id.as_str())
    );

    // All outbound delivery goes through this queue; broadcasts to this
    // session push onto it from other connections' handlers.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let session = SessionHandle::new(connection_id, user, tx);
    state.rooms.register(session.clone());

    let (mut sender, mut receiver) = socket.split();

    // Pump queued events out to the client.
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Read client intents and dispatch them. A payload that fails to parse
    // is logged and dropped; the connection stays up and no error event is
    // sent back. Non-text frames (binary, keepalive ping/pong) are skipped
    // for the same reason: only a close frame or a transport error ends
    // the session.
    let recv_state = state.clone();
    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            let msg = match frame {
                Ok(Message::Text(msg)) => msg,
                Ok(Message::Binary(_)) | Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Close(_)) | Err(_) => break,
            };
            let event: ClientEvent = match serde_json::from_str(&msg) {
                Ok(event) => event,
                Err(e) => {
                    error!(
                        "Malformed event from session {}: {} (payload: {})",
                        recv_session.id, e, msg
                    );
                    continue;
                }
            };
            dispatch(&recv_state, &recv_session, event);
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Disconnect: drop every room membership so later broadcasts no longer
    // see this session.
    state.rooms.unregister(connection_id);
    info!("WebSocket connection terminated: connection_id={}", connection_id);
}

fn dispatch(state: &Arc<AppState>, session: &SessionHandle, event: ClientEvent) {
    match event {
        ClientEvent::JoinChat { project_id } => chat::handle_join(state, session, &project_id),
        ClientEvent::LeaveChat { project_id } => chat::handle_leave(state, session, &project_id),
        ClientEvent::SendMessage { project_id, content } => {
            chat::handle_send_message(state, session, &project_id, content)
        }
        ClientEvent::Typing { project_id, user_name } => {
            chat::handle_typing(state, session, &project_id, user_name)
        }
        ClientEvent::JoinWhiteboard { project_id } => {
            whiteboard::handle_join(state, session, &project_id)
        }
        ClientEvent::LeaveWhiteboard { project_id } => {
            whiteboard::handle_leave(state, session, &project_id)
        }
        ClientEvent::WhiteboardShape { project_id, shape } => {
            whiteboard::handle_shape(state, session, &project_id, shape)
        }
        ClientEvent::WhiteboardClear { project_id } => {
            whiteboard::handle_clear(state, session, &project_id)
        }
        ClientEvent::JoinProject { project_id } => {
            project::handle_join(state, session, &project_id)
        }
        ClientEvent::LeaveProject { project_id } => {
            project::handle_leave(state, session, &project_id)
        }
        ClientEvent::ProjectUpdate { project_id, update_type, data } => {
            project::handle_project_update(state, session, &project_id, update_type, data)
        }
        ClientEvent::TaskUpdate { project_id, task } => {
            project::handle_task_update(state, session, &project_id, task)
        }
        ClientEvent::UserPresence { project_id, status } => {
            project::handle_user_presence(state, session, &project_id, status)
        }
    }
}
