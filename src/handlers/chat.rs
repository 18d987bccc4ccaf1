use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::models::{ChatHistoryQuery, ChatMessage};
use crate::services::chat_service;
use crate::state::AppState;

/// Persisted chat history for a project, oldest first. Unlike the
/// broadcast path this read is guaranteed to reflect only durably stored
/// messages.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Query(query): Query<ChatHistoryQuery>,
) -> Json<Vec<ChatMessage>> {
    let limit = query.limit.unwrap_or(state.config.chat_history_limit);
    let messages = chat_service::history(&state.store, &project_id, limit, query.before).await;
    Json(messages)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::models::{ChatMessage, UserRef};
    use crate::routes::api::app;
    use crate::state::AppState;

    #[tokio::test]
    async fn history_endpoint_returns_persisted_messages() {
        let state = AppState::new(Config::default());
        let sender = UserRef {
            id: "u1".into(),
            name: "Ada".into(),
        };
        for i in 0..3 {
            state
                .store
                .insert_chat_message(ChatMessage::new("p1", format!("m{}", i), sender.clone()))
                .await
                .unwrap();
        }
        let app = app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat/p1/messages?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let messages = body.as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "m1");
        assert_eq!(messages[1]["content"], "m2");
    }
}
