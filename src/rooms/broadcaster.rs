use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::rooms::registry::{RoomKey, RoomRegistry};
use crate::ws::events::ServerEvent;

/// Fans an event out to every current member of a room, optionally
/// excluding the sender.
///
/// Delivery is fire-and-forget and at-most-once per connected member: the
/// payload is serialized once and pushed onto each member's outbound
/// queue. A member that is mid-disconnect simply drops the event; that is
/// not an error for the broadcaster. Per-recipient ordering follows the
/// underlying per-connection queue; no cross-sender order is guaranteed.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<RoomRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    pub fn broadcast(&self, room: &RoomKey, event: &ServerEvent, exclude: Option<Uuid>) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize broadcast event for room {}: {}", room, e);
                return;
            }
        };

        for member in self.registry.members_of(room) {
            if exclude == Some(member.id) {
                continue;
            }
            let _ = member.tx.send(payload.clone());
        }
    }

    /// Deliver to all members including the sender (message sends, task
    /// updates: the sender's UI reconciles against the canonical payload).
    pub fn broadcast_all(&self, room: &RoomKey, event: &ServerEvent) {
        self.broadcast(room, event, None);
    }

    /// Deliver to all members except the sender (typing indicators,
    /// whiteboard events: the sender already rendered its change locally).
    pub fn broadcast_others(&self, room: &RoomKey, event: &ServerEvent, sender: Uuid) {
        self.broadcast(room, event, Some(sender));
    }
}
