use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::acting_user;
use crate::models::{
    ApiError, CreateDocumentRequest, Document, UpdateDocumentRequest, VersionHistoryResponse,
};
use crate::services::version_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    pub project_id: Option<String>,
}

/// Create a document. The new document has no versions yet.
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let doc = version_service::create_document(&state.store, req, acting_user(&headers)).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// List documents, optionally scoped to a project. Version history is
/// elided from list payloads.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDocumentsQuery>,
) -> Json<Vec<Document>> {
    let docs = state.store.list_documents(query.project_id.as_deref()).await;
    Json(docs.iter().map(Document::summary).collect())
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let doc = state
        .store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;
    Ok(Json(doc))
}

/// Content replace; a changed content triggers version snapshotting.
/// Editing a document locked by someone else yields 423.
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let doc =
        version_service::update_content(&state.store, doc_id, req, acting_user(&headers)).await?;
    Ok(Json(doc))
}

pub async fn get_version_history(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<Uuid>,
) -> Result<Json<VersionHistoryResponse>, ApiError> {
    let doc = state
        .store
        .get_document(doc_id)
        .await
        .ok_or(ApiError::NotFound("Document"))?;
    Ok(Json(VersionHistoryResponse {
        document_id: doc.id,
        title: doc.title,
        versions: doc.versions,
    }))
}

pub async fn restore_version(
    State(state): State<Arc<AppState>>,
    Path((doc_id, version_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<Document>, ApiError> {
    let doc =
        version_service::restore(&state.store, doc_id, version_id, acting_user(&headers)).await?;
    Ok(Json(doc))
}

pub async fn lock_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Document>, ApiError> {
    let doc = version_service::lock(&state.store, doc_id, acting_user(&headers)).await?;
    Ok(Json(doc))
}

pub async fn unlock_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Document>, ApiError> {
    let doc = version_service::unlock(&state.store, doc_id, acting_user(&headers)).await?;
    Ok(Json(doc))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::models::Document;
    use crate::routes::api::app;
    use crate::state::AppState;

    fn test_app() -> Router {
        app(AppState::new(Config::default()))
    }

    async fn request(
        app: &Router,
        method: &str,
        uri: &str,
        user: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", user)
            .header("x-user-name", format!("User {}", user));
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_doc(app: &Router) -> Document {
        let (status, body) = request(
            app,
            "POST",
            "/api/documents",
            "u1",
            Some(json!({"projectId": "p1", "title": "Notes"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn create_then_edit_then_restore_flow() {
        let app = test_app();
        let doc = create_doc(&app).await;
        assert!(doc.versions.is_empty());

        let uri = format!("/api/documents/{}", doc.id);
        let (status, body) = request(
            &app,
            "PUT",
            &uri,
            "u1",
            Some(json!({"currentContent": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["versions"].as_array().unwrap().len(), 0);

        let (_, body) = request(
            &app,
            "PUT",
            &uri,
            "u1",
            Some(json!({"currentContent": "Hello world"})),
        )
        .await;
        assert_eq!(body["versions"].as_array().unwrap().len(), 1);
        assert_eq!(body["versions"][0]["content"], "Hello");
        let version_id = body["versions"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = request(
            &app,
            "GET",
            &format!("/api/documents/{}/versions", doc.id),
            "u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["versions"].as_array().unwrap().len(), 1);

        let (status, body) = request(
            &app,
            "POST",
            &format!("/api/documents/{}/versions/{}/restore", doc.id, version_id),
            "u2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentContent"], "Hello");
        assert_eq!(body["versions"].as_array().unwrap().len(), 1);
        assert_eq!(body["lastEditedBy"]["id"], "u2");
    }

    #[tokio::test]
    async fn locked_document_edit_by_other_user_is_423() {
        let app = test_app();
        let doc = create_doc(&app).await;
        let uri = format!("/api/documents/{}", doc.id);

        let (status, _) = request(
            &app,
            "POST",
            &format!("/api/documents/{}/lock", doc.id),
            "u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = request(
            &app,
            "PUT",
            &uri,
            "u2",
            Some(json!({"currentContent": "hijack"})),
        )
        .await;
        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(body["code"], 423);

        // Holder unlocks, the other user can edit again.
        let (status, _) = request(
            &app,
            "POST",
            &format!("/api/documents/{}/unlock", doc.id),
            "u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = request(
            &app,
            "PUT",
            &uri,
            "u2",
            Some(json!({"currentContent": "fine now"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_document_and_version_are_404() {
        let app = test_app();

        let (status, _) = request(
            &app,
            "GET",
            "/api/documents/00000000-0000-0000-0000-000000000000",
            "u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let doc = create_doc(&app).await;
        let (status, _) = request(
            &app,
            "POST",
            &format!(
                "/api/documents/{}/versions/00000000-0000-0000-0000-000000000000/restore",
                doc.id
            ),
            "u1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let app = test_app();
        let (status, body) = request(
            &app,
            "POST",
            "/api/documents",
            "u1",
            Some(json!({"projectId": "p1", "title": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn list_elides_versions() {
        let app = test_app();
        let doc = create_doc(&app).await;
        let uri = format!("/api/documents/{}", doc.id);
        for content in ["a", "b", "c"] {
            request(&app, "PUT", &uri, "u1", Some(json!({"currentContent": content}))).await;
        }

        let (status, body) =
            request(&app, "GET", "/api/documents?projectId=p1", "u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["versions"].as_array().unwrap().len(), 0);

        let (_, body) = request(&app, "GET", &uri, "u1", None).await;
        assert_eq!(body["versions"].as_array().unwrap().len(), 2);
    }
}
