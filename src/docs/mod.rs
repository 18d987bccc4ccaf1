use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a new document
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created, no versions yet", body = Document),
        (status = 400, description = "Invalid document payload", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_document_doc() {}

/// Update a document; a content change appends a version snapshot
#[utoipa::path(
    put,
    path = "/api/documents/{docId}",
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = Document),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 423, description = "Document locked by another user", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn update_document_doc() {}

/// Version history of a document, oldest first
#[utoipa::path(
    get,
    path = "/api/documents/{docId}/versions",
    responses(
        (status = 200, description = "Ordered version list", body = VersionHistoryResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_version_history_doc() {}

/// Restore a stored version's content; history is never truncated
#[utoipa::path(
    post,
    path = "/api/documents/{docId}/versions/{versionId}/restore",
    responses(
        (status = 200, description = "Version restored", body = Document),
        (status = 404, description = "Document or version not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn restore_version_doc() {}

/// Persisted chat history for a project, oldest first
#[utoipa::path(
    get,
    path = "/api/chat/{projectId}/messages",
    responses(
        (status = 200, description = "Messages", body = [ChatMessage])
    )
)]
#[allow(dead_code)]
pub async fn get_messages_doc() {}

/// The project's whiteboard, created on first access
#[utoipa::path(
    get,
    path = "/api/whiteboards/{projectId}",
    responses(
        (status = 200, description = "Whiteboard", body = Whiteboard)
    )
)]
#[allow(dead_code)]
pub async fn get_whiteboard_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        create_document_doc,
        update_document_doc,
        get_version_history_doc,
        restore_version_doc,
        get_messages_doc,
        get_whiteboard_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            DiagnosticsResponse,
            UserRef,
            Document,
            DocumentVersion,
            CreateDocumentRequest,
            UpdateDocumentRequest,
            VersionHistoryResponse,
            ChatMessage,
            Whiteboard,
            WhiteboardShape,
            ShapeKind,
            ShapePosition,
            ShapeDimensions,
            ShapeStyle,
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
