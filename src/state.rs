use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::config::Config;
use crate::rooms::{Broadcaster, RoomRegistry};
use crate::store::MemStore;

/// Shared server state: the room registry, the broadcaster over it, the
/// entity store and the presence table. Owned explicitly and injected
/// into handlers rather than living in module globals, with lifecycle
/// tied to the server process.
pub struct AppState {
    pub config: Config,
    pub store: Arc<MemStore>,
    pub rooms: Arc<RoomRegistry>,
    pub broadcaster: Broadcaster,
    /// `{project_id}:{user_id}` -> last reported status; entries expire on
    /// their own, there is no explicit "went away" event.
    pub presence: Cache<String, String>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let rooms = Arc::new(RoomRegistry::new());
        let broadcaster = Broadcaster::new(rooms.clone());
        let presence = Cache::builder()
            .max_capacity(100_000)
            .time_to_live(Duration::from_secs(config.presence_ttl_secs))
            .build();
        Arc::new(Self {
            config,
            store: Arc::new(MemStore::new()),
            rooms,
            broadcaster,
            presence,
        })
    }
}
