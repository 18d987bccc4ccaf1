pub mod chat;
pub mod diagnostics;
pub mod document;
pub mod health;
pub mod whiteboard;

pub use chat::*;
pub use diagnostics::*;
pub use document::*;
pub use health::*;
pub use whiteboard::*;

use axum::http::HeaderMap;

use crate::models::UserRef;

/// Acting identity for REST calls. Auth middleware is an upstream
/// collaborator; these headers stand in for its verified output, with the
/// usual anonymous fallback when absent.
pub fn acting_user(headers: &HeaderMap) -> UserRef {
    let id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();
    let name = headers
        .get("x-user-name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("Anonymous")
        .to_string();
    UserRef { id, name }
}
