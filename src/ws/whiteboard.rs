use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::WhiteboardShape;
use crate::rooms::{RoomKey, SessionHandle};
use crate::state::AppState;
use crate::ws::events::ServerEvent;

pub fn handle_join(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::whiteboard(project_id);
    state.rooms.join(session.id, room.clone());
    info!("🎨 Session {} joined whiteboard: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

pub fn handle_leave(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::whiteboard(project_id);
    state.rooms.leave(session.id, &room);
    info!("🎨 Session {} left whiteboard: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

/// All-but-sender: the sender already drew the shape locally. This path
/// performs no persistence; the whiteboard's shape list is saved through
/// the HTTP surface and the two are not transactionally linked.
pub fn handle_shape(
    state: &Arc<AppState>,
    session: &SessionHandle,
    project_id: &str,
    mut shape: WhiteboardShape,
) {
    if shape.created_by.is_none() {
        shape.created_by = Some(session.identity().id);
    }
    if shape.created_at.is_none() {
        shape.created_at = Some(Utc::now());
    }
    state.broadcaster.broadcast_others(
        &RoomKey::whiteboard(project_id),
        &ServerEvent::WhiteboardShape { shape },
        session.id,
    );
}

/// All-but-sender full-canvas reset signal.
pub fn handle_clear(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    state.broadcaster.broadcast_others(
        &RoomKey::whiteboard(project_id),
        &ServerEvent::WhiteboardClear,
        session.id,
    );
}
