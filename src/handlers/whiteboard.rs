use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;

use crate::handlers::acting_user;
use crate::models::{Whiteboard, WhiteboardShape};
use crate::state::AppState;

/// Fetch the project's whiteboard, creating it on first access. One
/// whiteboard exists per project.
pub async fn get_whiteboard(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Json<Whiteboard> {
    Json(state.store.get_or_create_whiteboard(&project_id).await)
}

/// Append a shape to the persisted shape list. This is the durable
/// counterpart of the real-time `whiteboardShape` broadcast; the two paths
/// are not transactionally linked.
pub async fn add_shape(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    Json(mut shape): Json<WhiteboardShape>,
) -> Json<Whiteboard> {
    if shape.created_by.is_none() {
        shape.created_by = Some(acting_user(&headers).id);
    }
    if shape.created_at.is_none() {
        shape.created_at = Some(Utc::now());
    }
    Json(state.store.append_shape(&project_id, shape).await)
}

/// Persisted full-canvas reset.
pub async fn clear_whiteboard(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Json<Whiteboard> {
    Json(state.store.clear_whiteboard(&project_id).await)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::routes::api::app;
    use crate::state::AppState;

    #[tokio::test]
    async fn shape_append_and_clear_round_trip() {
        let app = app(AppState::new(Config::default()));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/whiteboards/p1/shapes")
                    .header("content-type", "application/json")
                    .header("x-user-id", "u1")
                    .body(Body::from(
                        json!({"id": "s1", "type": "rect", "position": {"x": 0.0, "y": 0.0}})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let board: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(board["shapes"].as_array().unwrap().len(), 1);
        assert_eq!(board["shapes"][0]["createdBy"], "u1");
        assert_eq!(board["version"], 2);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/whiteboards/p1/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let board: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(board["shapes"].as_array().unwrap().len(), 0);
        assert_eq!(board["version"], 3);
    }
}
