use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display identity attached to messages, versions and presence events.
///
/// Sessions without an authenticated user fall back to an anonymous
/// identity derived from the connection id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn anonymous(connection_id: &str) -> Self {
        Self {
            id: connection_id.to_string(),
            name: "Anonymous".to_string(),
        }
    }
}
