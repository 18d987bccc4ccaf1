use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserRef;

/// Chat message as broadcast to a room and persisted for the history
/// read path. The broadcast does not wait for the persisted write.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub project_id: String,
    pub content: String,
    pub sender: UserRef,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(project_id: &str, content: String, sender: UserRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            content,
            sender,
            created_at: Utc::now(),
        }
    }
}

/// Query parameters for the chat history endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ChatHistoryQuery {
    pub limit: Option<usize>,
    pub before: Option<DateTime<Utc>>,
}
