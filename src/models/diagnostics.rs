use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for the diagnostics endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub n_conn: usize,
    pub n_rooms: usize,
    pub n_chat_rooms: usize,
    pub n_whiteboard_rooms: usize,
    pub n_project_rooms: usize,
    pub n_documents: usize,
    pub n_whiteboards: usize,
    pub n_chat_messages: usize,
    pub n_presence: usize,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
