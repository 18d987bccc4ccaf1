use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    add_shape, clear_whiteboard, create_document, diagnostics, get_document, get_messages,
    get_version_history, get_whiteboard, health_check, list_documents, lock_document, ready_check,
    restore_version, unlock_document, update_document,
};
use crate::state::AppState;
use crate::ws::handler::websocket_handler;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/documents", post(create_document).get(list_documents))
        .route("/documents/:doc_id", get(get_document).put(update_document))
        .route("/documents/:doc_id/versions", get(get_version_history))
        .route(
            "/documents/:doc_id/versions/:version_id/restore",
            post(restore_version),
        )
        .route("/documents/:doc_id/lock", post(lock_document))
        .route("/documents/:doc_id/unlock", post(unlock_document))
        .route("/chat/:project_id/messages", get(get_messages))
        .route("/whiteboards/:project_id", get(get_whiteboard))
        .route("/whiteboards/:project_id/shapes", post(add_shape))
        .route("/whiteboards/:project_id/clear", post(clear_whiteboard))
        .with_state(state)
}

/// Full application router: the REST surface nested under /api plus the
/// real-time socket endpoint.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", create_api_routes(state.clone()))
        .route("/ws", get(websocket_handler).with_state(state))
}
