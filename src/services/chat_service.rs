use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{ApiError, ChatMessage};
use crate::store::MemStore;

/// Persist a message that was already broadcast. Best-effort: the caller
/// does not wait on this and a failed write never retracts the broadcast.
pub async fn append_message(store: &MemStore, message: ChatMessage) -> Result<(), ApiError> {
    store.insert_chat_message(message).await.map_err(|e| {
        warn!("Chat message not persisted: {}", e);
        ApiError::from(e)
    })
}

/// Persisted history for a project, oldest first.
pub async fn history(
    store: &MemStore,
    project_id: &str,
    limit: usize,
    before: Option<DateTime<Utc>>,
) -> Vec<ChatMessage> {
    store.chat_history(project_id, limit, before).await
}
