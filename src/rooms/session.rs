use tokio::sync::mpsc::UnboundedSender;
use tracing::error;
use uuid::Uuid;

use crate::models::UserRef;
use crate::ws::events::ServerEvent;

/// Handle for one live connection: identity plus the outbound event queue.
///
/// The handle is cheap to clone; the registry hands out clones for fan-out
/// so broadcasts never hold the registry lock while sending.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    pub user: Option<UserRef>,
    pub tx: UnboundedSender<String>,
}

impl SessionHandle {
    pub fn new(id: Uuid, user: Option<UserRef>, tx: UnboundedSender<String>) -> Self {
        Self { id, user, tx }
    }

    /// Authenticated identity, or the anonymous fallback for this connection.
    pub fn identity(&self) -> UserRef {
        self.user
            .clone()
            .unwrap_or_else(|| UserRef::anonymous(&self.id.to_string()))
    }

    /// Send an event to this session only. A closed connection drops the
    /// event silently; delivery here is fire-and-forget.
    pub fn send(&self, event: &ServerEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => {
                let _ = self.tx.send(payload);
            }
            Err(e) => error!("Failed to serialize event for session {}: {}", self.id, e),
        }
    }
}

#[cfg(test)]
pub fn test_session() -> (SessionHandle, tokio::sync::mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    (SessionHandle::new(Uuid::new_v4(), None, tx), rx)
}
