use std::sync::{Arc, Mutex, OnceLock};

use axum::extract::State;
use axum::Json;
use sysinfo::System;
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::state::AppState;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Aggregate registry, store and system stats.
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let stats = state.rooms.stats();
    let n_documents = state.store.document_count().await;
    let n_whiteboards = state.store.whiteboard_count().await;
    let n_chat_messages = state.store.chat_message_count().await;

    state.presence.run_pending_tasks();
    let n_presence = state.presence.entry_count() as usize;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Rooms: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        stats.n_sessions,
        stats.n_rooms
    );

    Json(DiagnosticsResponse {
        n_conn: stats.n_sessions,
        n_rooms: stats.n_rooms,
        n_chat_rooms: stats.n_chat_rooms,
        n_whiteboard_rooms: stats.n_whiteboard_rooms,
        n_project_rooms: stats.n_project_rooms,
        n_documents,
        n_whiteboards,
        n_chat_messages,
        n_presence,
        cpu_usage,
        memory_alloc,
        memory_total,
        memory_free,
    })
}
