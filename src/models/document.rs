use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserRef;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CHANGE_NOTE_LEN: usize = 500;

/// Immutable snapshot of a document's content at the moment it was superseded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub edited_by: UserRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_note: Option<String>,
}

/// Collaborative document with append-only version history and an
/// advisory single-writer lock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub project_id: String,
    pub title: String,
    pub current_content: String,
    pub versions: Vec<DocumentVersion>,
    pub created_by: UserRef,
    pub last_edited_by: Option<UserRef>,
    pub is_locked: bool,
    pub locked_by: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(project_id: String, title: String, content: String, tags: Vec<String>, created_by: UserRef) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            current_content: content,
            versions: Vec::new(),
            last_edited_by: Some(created_by.clone()),
            created_by,
            is_locked: false,
            locked_by: None,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// List payloads elide the full version history.
    pub fn summary(&self) -> Self {
        let mut doc = self.clone();
        doc.versions = Vec::new();
        doc
    }
}

/// Request to create a document
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub current_content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to update a document. Only supplied fields are touched; a
/// content change is what triggers version snapshotting.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub current_content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub change_note: Option<String>,
}

/// Version history of a document, oldest entry first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistoryResponse {
    pub document_id: Uuid,
    pub title: String,
    pub versions: Vec<DocumentVersion>,
}
