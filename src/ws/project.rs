use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::rooms::{RoomKey, SessionHandle};
use crate::state::AppState;
use crate::ws::events::ServerEvent;

pub fn handle_join(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::project(project_id);
    state.rooms.join(session.id, room.clone());
    info!("📂 Session {} joined project: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

pub fn handle_leave(state: &Arc<AppState>, session: &SessionHandle, project_id: &str) {
    let room = RoomKey::project(project_id);
    state.rooms.leave(session.id, &room);
    info!("📂 Session {} left project: {}", session.id, project_id);
    session.send(&ServerEvent::Ack {
        room: room.to_string(),
        success: true,
    });
}

/// All-but-sender, server-stamped timestamp.
pub fn handle_project_update(
    state: &Arc<AppState>,
    session: &SessionHandle,
    project_id: &str,
    update_type: String,
    data: serde_json::Value,
) {
    state.broadcaster.broadcast_others(
        &RoomKey::project(project_id),
        &ServerEvent::ProjectUpdate {
            update_type,
            data,
            timestamp: Utc::now(),
        },
        session.id,
    );
}

/// All members including the sender, so its optimistic UI reconciles with
/// the canonical payload.
pub fn handle_task_update(
    state: &Arc<AppState>,
    _session: &SessionHandle,
    project_id: &str,
    task: serde_json::Value,
) {
    state
        .broadcaster
        .broadcast_all(&RoomKey::project(project_id), &ServerEvent::TaskUpdate { task });
}

/// All-but-sender, tagged with the sender identity and a server timestamp.
/// Also refreshes the TTL presence table entry for this user.
pub fn handle_user_presence(
    state: &Arc<AppState>,
    session: &SessionHandle,
    project_id: &str,
    status: String,
) {
    let identity = session.identity();
    state
        .presence
        .insert(format!("{}:{}", project_id, identity.id), status.clone());
    state.broadcaster.broadcast_others(
        &RoomKey::project(project_id),
        &ServerEvent::UserPresence {
            user_id: identity.id,
            user_name: identity.name,
            status,
            timestamp: Utc::now(),
        },
        session.id,
    );
}
