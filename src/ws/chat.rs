use std::sync::Arc;

use tracing::info;

use crate::models::ChatMessage;
use crate::rooms::{RoomKey, SessionHandle};
use crate::services::chat_service;
use crate::state::AppState;
use crate::ws::events::ServerEvent;

pub fn handle_join(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::chat(project_id);
    state.rooms.join(session.id, room.clone());
    info!("📥 Session {} joined chat: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

pub fn handle_leave(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::chat(project_id);
    state.rooms.leave(session.id, &room);
    info!("📤 Session {} left chat: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

/// Broadcast to the whole room, sender included, then persist on a
/// detached task. The broadcast never waits for the durable write.
pub fn handle_send_message(
    state: &Arc<AppState>,
    session: &SessionHandle,
    project_id: &str,
    content: String,
) {
    let message = ChatMessage::new(project_id, content, session.identity());
    state.broadcaster.broadcast_all(
        &RoomKey::chat(project_id),
        &ServerEvent::NewMessage {
            message: message.clone(),
        },
    );

    let store = state.store.clone();
    tokio::spawn(async move {
        // append_message logs the failure; nothing to do here either way.
        let _ = chat_service::append_message(&store, message).await;
    });
}

/// All-but-sender; the indicator expires client-side after `ttl_ms`.
pub fn handle_typing(
    state: &Arc<AppState>,
    session: &SessionHandle,
    project_id: &str,
    user_name: Option<String>,
) {
    let identity = session.identity();
    state.broadcaster.broadcast_others(
        &RoomKey::chat(project_id),
        &ServerEvent::TypingIndicator {
            user_id: identity.id,
            user_name: user_name.unwrap_or_else(|| "Someone".to_string()),
            ttl_ms: state.config.typing_ttl_ms,
        },
        session.id,
    );
}
