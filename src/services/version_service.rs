use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    ApiError, CreateDocumentRequest, Document, DocumentVersion, UpdateDocumentRequest, UserRef,
    MAX_CHANGE_NOTE_LEN, MAX_TITLE_LEN,
};
use crate::store::MemStore;

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("Document title is required".into()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ApiError::Validation(format!(
            "Title cannot exceed {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

pub async fn create_document(
    store: &MemStore,
    req: CreateDocumentRequest,
    acting: UserRef,
) -> Result<Document, ApiError> {
    validate_title(&req.title)?;
    if req.project_id.trim().is_empty() {
        return Err(ApiError::Validation("projectId is required".into()));
    }
    let doc = Document::new(
        req.project_id,
        req.title.trim().to_string(),
        req.current_content,
        req.tags,
        acting,
    );
    store.insert_document(doc.clone()).await;
    Ok(doc)
}

/// Apply an update to a document, snapshotting the superseded content.
///
/// A version is appended only when the incoming content differs from the
/// stored value and a prior content existed (a document created empty gets
/// no snapshot on its first real write). The snapshot captures the content
/// being replaced and the editor who wrote it, never the incoming values.
pub async fn update_content(
    store: &MemStore,
    doc_id: Uuid,
    req: UpdateDocumentRequest,
    acting: UserRef,
) -> Result<Document, ApiError> {
    let mut doc = store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;

    if doc.is_locked && doc.locked_by.as_deref() != Some(acting.id.as_str()) {
        return Err(ApiError::Locked);
    }

    if let Some(note) = &req.change_note {
        if note.len() > MAX_CHANGE_NOTE_LEN {
            return Err(ApiError::Validation(format!(
                "Change note cannot exceed {} characters",
                MAX_CHANGE_NOTE_LEN
            )));
        }
    }

    if let Some(title) = req.title {
        validate_title(&title)?;
        doc.title = title.trim().to_string();
    }
    if let Some(tags) = req.tags {
        doc.tags = tags;
    }

    if let Some(content) = req.current_content {
        if content != doc.current_content {
            if !doc.current_content.is_empty() {
                let previous_editor = doc
                    .last_edited_by
                    .clone()
                    .unwrap_or_else(|| doc.created_by.clone());
                doc.versions.push(DocumentVersion {
                    id: Uuid::new_v4(),
                    content: doc.current_content.clone(),
                    timestamp: Utc::now(),
                    edited_by: previous_editor,
                    change_note: req.change_note,
                });
            }
            doc.current_content = content;
        }
        doc.last_edited_by = Some(acting);
    }

    doc.updated_at = Utc::now();
    store.save_document(doc.clone()).await;
    Ok(doc)
}

/// Version history in insertion order, oldest first. Callers wanting
/// newest-first reverse explicitly.
pub async fn get_history(store: &MemStore, doc_id: Uuid) -> Result<Vec<DocumentVersion>, ApiError> {
    let doc = store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;
    Ok(doc.versions)
}

/// Re-apply a stored version's content. History is never truncated and no
/// restore checkpoint is inserted; the restored content gets snapshotted
/// like any other content the next time an edit supersedes it.
pub async fn restore(
    store: &MemStore,
    doc_id: Uuid,
    version_id: Uuid,
    acting: UserRef,
) -> Result<Document, ApiError> {
    let mut doc = store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;

    if doc.is_locked && doc.locked_by.as_deref() != Some(acting.id.as_str()) {
        return Err(ApiError::Locked);
    }

    let content = doc
        .versions
        .iter()
        .find(|v| v.id == version_id)
        .map(|v| v.content.clone())
        .ok_or(ApiError::NotFound("Version"))?;

    doc.current_content = content;
    doc.last_edited_by = Some(acting);
    doc.updated_at = Utc::now();
    store.save_document(doc.clone()).await;
    Ok(doc)
}

/// Take the advisory lock. Idempotent for the current holder.
pub async fn lock(store: &MemStore, doc_id: Uuid, acting: UserRef) -> Result<Document, ApiError> {
    let mut doc = store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;

    if doc.is_locked && doc.locked_by.as_deref() != Some(acting.id.as_str()) {
        return Err(ApiError::Locked);
    }

    doc.is_locked = true;
    doc.locked_by = Some(acting.id);
    doc.updated_at = Utc::now();
    store.save_document(doc.clone()).await;
    Ok(doc)
}

/// Release the advisory lock. Only the holder may release it; unlocking an
/// unlocked document is a no-op.
pub async fn unlock(store: &MemStore, doc_id: Uuid, acting: UserRef) -> Result<Document, ApiError> {
    let mut doc = store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;

    if doc.is_locked && doc.locked_by.as_deref() != Some(acting.id.as_str()) {
        return Err(ApiError::Forbidden(
            "Document is locked by another user".into(),
        ));
    }

    doc.is_locked = false;
    doc.locked_by = None;
    doc.updated_at = Utc::now();
    store.save_document(doc.clone()).await;
    Ok(doc)
}
