use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ApiError, ChatMessage, Document, Whiteboard, WhiteboardShape};

/// Upper bound on retained chat history per project. Writes beyond the
/// bound are refused so an unbounded room cannot exhaust memory.
pub const CHAT_CAPACITY_PER_PROJECT: usize = 10_000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage capacity exceeded for {0}")]
    CapacityExceeded(&'static str),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Transient(e.to_string())
    }
}

/// Process-wide entity store backing documents, chat history and
/// whiteboards. In-memory in the reference deployment; every operation is
/// async so a durable backend can sit behind the same surface.
pub struct MemStore {
    documents: RwLock<HashMap<Uuid, Document>>,
    chat: RwLock<HashMap<String, Vec<ChatMessage>>>,
    whiteboards: RwLock<HashMap<String, Whiteboard>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            chat: RwLock::new(HashMap::new()),
            whiteboards: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert_document(&self, doc: Document) {
        self.documents.write().await.insert(doc.id, doc);
    }

    pub async fn get_document(&self, id: Uuid) -> Option<Document> {
        self.documents.read().await.get(&id).cloned()
    }

    /// Upsert by id; the version controller owns what goes into the record.
    pub async fn save_document(&self, doc: Document) {
        self.documents.write().await.insert(doc.id, doc);
    }

    /// Documents, most recently updated first, optionally scoped to a project.
    pub async fn list_documents(&self, project_id: Option<&str>) -> Vec<Document> {
        let docs = self.documents.read().await;
        let mut out: Vec<Document> = docs
            .values()
            .filter(|d| project_id.map_or(true, |p| d.project_id == p))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        out
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn insert_chat_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        let mut chat = self.chat.write().await;
        let messages = chat.entry(message.project_id.clone()).or_default();
        if messages.len() >= CHAT_CAPACITY_PER_PROJECT {
            return Err(StoreError::CapacityExceeded("chat history"));
        }
        messages.push(message);
        Ok(())
    }

    /// Persisted messages for a project, oldest first. `before` filters to
    /// messages created strictly earlier; `limit` keeps the most recent of
    /// what remains. Writes land in commit order, which can differ from
    /// `created_at` order when sends race, so the read path sorts.
    pub async fn chat_history(
        &self,
        project_id: &str,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Vec<ChatMessage> {
        let chat = self.chat.read().await;
        let Some(messages) = chat.get(project_id) else {
            return Vec::new();
        };
        let mut filtered: Vec<&ChatMessage> = messages
            .iter()
            .filter(|m| before.map_or(true, |b| m.created_at < b))
            .collect();
        filtered.sort_by_key(|m| m.created_at);
        let skip = filtered.len().saturating_sub(limit);
        filtered.into_iter().skip(skip).cloned().collect()
    }

    pub async fn chat_message_count(&self) -> usize {
        self.chat.read().await.values().map(Vec::len).sum()
    }

    /// One whiteboard per project: created on first access, returned
    /// as-is afterwards.
    pub async fn get_or_create_whiteboard(&self, project_id: &str) -> Whiteboard {
        let mut boards = self.whiteboards.write().await;
        boards
            .entry(project_id.to_string())
            .or_insert_with(|| Whiteboard::new(project_id))
            .clone()
    }

    pub async fn append_shape(&self, project_id: &str, shape: WhiteboardShape) -> Whiteboard {
        let mut boards = self.whiteboards.write().await;
        let board = boards
            .entry(project_id.to_string())
            .or_insert_with(|| Whiteboard::new(project_id));
        board.shapes.push(shape);
        board.version += 1;
        board.updated_at = Utc::now();
        board.clone()
    }

    pub async fn clear_whiteboard(&self, project_id: &str) -> Whiteboard {
        let mut boards = self.whiteboards.write().await;
        let board = boards
            .entry(project_id.to_string())
            .or_insert_with(|| Whiteboard::new(project_id));
        board.shapes.clear();
        board.version += 1;
        board.updated_at = Utc::now();
        board.clone()
    }

    pub async fn whiteboard_count(&self) -> usize {
        self.whiteboards.read().await.len()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShapeKind, UserRef};

    fn shape(id: &str) -> WhiteboardShape {
        WhiteboardShape {
            id: id.to_string(),
            kind: ShapeKind::Rect,
            data: serde_json::Value::Null,
            position: None,
            dimensions: None,
            style: None,
            created_by: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn whiteboard_is_unique_per_project() {
        let store = MemStore::new();
        let first = store.get_or_create_whiteboard("p1").await;
        store.append_shape("p1", shape("s1")).await;
        let second = store.get_or_create_whiteboard("p1").await;

        assert_eq!(first.version, 1);
        assert_eq!(second.shapes.len(), 1);
        assert_eq!(store.whiteboard_count().await, 1);
    }

    #[tokio::test]
    async fn clear_empties_shapes_and_bumps_version() {
        let store = MemStore::new();
        store.append_shape("p1", shape("s1")).await;
        store.append_shape("p1", shape("s2")).await;

        let board = store.clear_whiteboard("p1").await;
        assert!(board.shapes.is_empty());
        assert_eq!(board.version, 4);
    }

    #[tokio::test]
    async fn chat_history_is_oldest_first_with_limit() {
        let store = MemStore::new();
        let sender = UserRef {
            id: "u1".into(),
            name: "Ada".into(),
        };
        for i in 0..5 {
            store
                .insert_chat_message(ChatMessage::new("p1", format!("m{}", i), sender.clone()))
                .await
                .unwrap();
        }

        let history = store.chat_history("p1", 3, None).await;
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn chat_history_orders_by_created_at_not_commit_order() {
        let store = MemStore::new();
        let sender = UserRef {
            id: "u1".into(),
            name: "Ada".into(),
        };
        let mut first = ChatMessage::new("p1", "first".into(), sender.clone());
        first.created_at = Utc::now() - chrono::Duration::seconds(1);
        let second = ChatMessage::new("p1", "second".into(), sender);
        // Detached persistence tasks can commit out of send order.
        store.insert_chat_message(second).await.unwrap();
        store.insert_chat_message(first).await.unwrap();

        let history = store.chat_history("p1", 50, None).await;
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn chat_history_respects_before_filter() {
        let store = MemStore::new();
        let sender = UserRef {
            id: "u1".into(),
            name: "Ada".into(),
        };
        store
            .insert_chat_message(ChatMessage::new("p1", "old".into(), sender.clone()))
            .await
            .unwrap();
        let cutoff = Utc::now();
        store
            .insert_chat_message(ChatMessage::new("p1", "new".into(), sender))
            .await
            .unwrap();

        let history = store.chat_history("p1", 50, Some(cutoff)).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "old");
    }
}
