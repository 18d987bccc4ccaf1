use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::rooms::session::SessionHandle;

/// The three broadcast channel families of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Project,
    Chat,
    Whiteboard,
}

impl ChannelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Project => "project",
            ChannelKind::Chat => "chat",
            ChannelKind::Whiteboard => "whiteboard",
        }
    }
}

/// A named broadcast scope, keyed by channel kind plus project id.
/// Rooms are created implicitly on first join and never explicitly
/// destroyed; membership is the only state they carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    pub kind: ChannelKind,
    pub project_id: String,
}

impl RoomKey {
    pub fn new(kind: ChannelKind, project_id: &str) -> Self {
        Self {
            kind,
            project_id: project_id.to_string(),
        }
    }

    pub fn project(project_id: &str) -> Self {
        Self::new(ChannelKind::Project, project_id)
    }

    pub fn chat(project_id: &str) -> Self {
        Self::new(ChannelKind::Chat, project_id)
    }

    pub fn whiteboard(project_id: &str) -> Self {
        Self::new(ChannelKind::Whiteboard, project_id)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.as_str(), self.project_id)
    }
}

/// Membership counts for the diagnostics endpoint.
#[derive(Debug, Default)]
pub struct RegistryStats {
    pub n_sessions: usize,
    pub n_rooms: usize,
    pub n_chat_rooms: usize,
    pub n_whiteboard_rooms: usize,
    pub n_project_rooms: usize,
}

#[derive(Default)]
struct RegistryInner {
    sessions: HashMap<Uuid, SessionHandle>,
    rooms: HashMap<RoomKey, HashSet<Uuid>>,
    // Reverse index so leave_all does not scan every room.
    joined: HashMap<Uuid, HashSet<RoomKey>>,
}

/// Tracks which sessions belong to which rooms. Purely in-memory,
/// single-process; one mutex guards the whole table so joins and leaves
/// are atomic with respect to `members_of` snapshots.
///
/// No authorization happens at this layer; callers are expected to have
/// authorized the session before joining it to a room.
pub struct RoomRegistry {
    inner: Mutex<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Register a freshly connected session so broadcasts can reach it.
    pub fn register(&self, session: SessionHandle) {
        let mut inner = self.inner.lock().unwrap();
        inner.joined.entry(session.id).or_default();
        inner.sessions.insert(session.id, session);
    }

    /// Remove a session entirely: all room memberships plus the handle.
    /// Invoked on disconnect.
    pub fn unregister(&self, session_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        Self::leave_all_locked(&mut inner, session_id);
        inner.sessions.remove(&session_id);
        debug!("Session {} unregistered", session_id);
    }

    /// Idempotent: joining a room already joined is a no-op, so a session
    /// can never be double-delivered future broadcasts.
    pub fn join(&self, session_id: Uuid, room: RoomKey) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.sessions.contains_key(&session_id) {
            return;
        }
        inner.rooms.entry(room.clone()).or_default().insert(session_id);
        inner.joined.entry(session_id).or_default().insert(room);
    }

    /// Idempotent: leaving a room not joined is a no-op. Rooms left with
    /// zero members are dropped from the table.
    pub fn leave(&self, session_id: Uuid, room: &RoomKey) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(members) = inner.rooms.get_mut(room) {
            members.remove(&session_id);
            if members.is_empty() {
                inner.rooms.remove(room);
            }
        }
        if let Some(joined) = inner.joined.get_mut(&session_id) {
            joined.remove(room);
        }
    }

    /// Remove the session from every room it was in.
    pub fn leave_all(&self, session_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        Self::leave_all_locked(&mut inner, session_id);
    }

    fn leave_all_locked(inner: &mut RegistryInner, session_id: Uuid) {
        let rooms = inner.joined.remove(&session_id).unwrap_or_default();
        for room in rooms {
            if let Some(members) = inner.rooms.get_mut(&room) {
                members.remove(&session_id);
                if members.is_empty() {
                    inner.rooms.remove(&room);
                }
            }
        }
    }

    /// Snapshot of the current member handles of a room. An unknown room
    /// key yields an empty set.
    pub fn members_of(&self, room: &RoomKey) -> Vec<SessionHandle> {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| inner.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_member(&self, session_id: Uuid, room: &RoomKey) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(room)
            .map(|members| members.contains(&session_id))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> RegistryStats {
        let inner = self.inner.lock().unwrap();
        let mut stats = RegistryStats {
            n_sessions: inner.sessions.len(),
            n_rooms: inner.rooms.len(),
            ..Default::default()
        };
        for room in inner.rooms.keys() {
            match room.kind {
                ChannelKind::Chat => stats.n_chat_rooms += 1,
                ChannelKind::Whiteboard => stats.n_whiteboard_rooms += 1,
                ChannelKind::Project => stats.n_project_rooms += 1,
            }
        }
        stats
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::session::test_session;

    #[test]
    fn join_is_idempotent() {
        let registry = RoomRegistry::new();
        let (session, _rx) = test_session();
        let id = session.id;
        registry.register(session);

        let room = RoomKey::chat("p1");
        registry.join(id, room.clone());
        registry.join(id, room.clone());

        assert_eq!(registry.members_of(&room).len(), 1);

        registry.leave(id, &room);
        assert!(!registry.is_member(id, &room));
        assert!(registry.members_of(&room).is_empty());
    }

    #[test]
    fn leave_is_idempotent() {
        let registry = RoomRegistry::new();
        let (session, _rx) = test_session();
        let id = session.id;
        registry.register(session);

        let room = RoomKey::chat("p1");
        registry.join(id, room.clone());
        registry.leave(id, &room);
        registry.leave(id, &room);

        assert!(!registry.is_member(id, &room));
    }

    #[test]
    fn leave_without_join_is_noop() {
        let registry = RoomRegistry::new();
        let (session, _rx) = test_session();
        let id = session.id;
        registry.register(session);

        registry.leave(id, &RoomKey::whiteboard("p1"));
        assert_eq!(registry.stats().n_rooms, 0);
    }

    #[test]
    fn unregister_removes_all_memberships() {
        let registry = RoomRegistry::new();
        let (session, _rx) = test_session();
        let id = session.id;
        registry.register(session);

        let r1 = RoomKey::chat("p1");
        let r2 = RoomKey::project("p1");
        registry.join(id, r1.clone());
        registry.join(id, r2.clone());

        registry.unregister(id);

        assert!(registry.members_of(&r1).is_empty());
        assert!(registry.members_of(&r2).is_empty());
        assert_eq!(registry.stats().n_sessions, 0);
    }

    #[test]
    fn unknown_room_reads_empty() {
        let registry = RoomRegistry::new();
        assert!(registry.members_of(&RoomKey::project("nope")).is_empty());
    }

    #[test]
    fn join_of_unregistered_session_is_ignored() {
        let registry = RoomRegistry::new();
        let room = RoomKey::chat("p1");
        registry.join(Uuid::new_v4(), room.clone());
        assert!(registry.members_of(&room).is_empty());
    }

    #[test]
    fn room_key_wire_format() {
        assert_eq!(RoomKey::chat("p1").to_string(), "chat_p1");
        assert_eq!(RoomKey::whiteboard("p1").to_string(), "whiteboard_p1");
        assert_eq!(RoomKey::project("p1").to_string(), "project_p1");
    }

    #[test]
    fn stats_count_rooms_by_kind() {
        let registry = RoomRegistry::new();
        let (session, _rx) = test_session();
        let id = session.id;
        registry.register(session);

        registry.join(id, RoomKey::chat("p1"));
        registry.join(id, RoomKey::whiteboard("p1"));
        registry.join(id, RoomKey::project("p1"));

        let stats = registry.stats();
        assert_eq!(stats.n_rooms, 3);
        assert_eq!(stats.n_chat_rooms, 1);
        assert_eq!(stats.n_whiteboard_rooms, 1);
        assert_eq!(stats.n_project_rooms, 1);
    }
}
