use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, WhiteboardShape};

/// Inbound client intents, one variant per protocol event. Payload shapes
/// are validated at the boundary by deserialization; a payload that does
/// not match any variant is logged and dropped without disconnecting.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinChat { project_id: String },
    LeaveChat { project_id: String },
    SendMessage { project_id: String, content: String },
    Typing { project_id: String, user_name: Option<String> },
    JoinWhiteboard { project_id: String },
    LeaveWhiteboard { project_id: String },
    WhiteboardShape { project_id: String, shape: WhiteboardShape },
    WhiteboardClear { project_id: String },
    JoinProject { project_id: String },
    LeaveProject { project_id: String },
    ProjectUpdate {
        project_id: String,
        update_type: String,
        data: serde_json::Value,
    },
    TaskUpdate { project_id: String, task: serde_json::Value },
    UserPresence { project_id: String, status: String },
}

/// Outbound server events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Join/leave acknowledgment, sent to the caller only.
    Ack { room: String, success: bool },
    NewMessage { message: ChatMessage },
    /// Transient indicator; valid for `ttl_ms` after receipt, after which
    /// the client clears it. No explicit stopped-typing event exists.
    TypingIndicator {
        user_id: String,
        user_name: String,
        ttl_ms: u64,
    },
    WhiteboardShape { shape: WhiteboardShape },
    WhiteboardClear,
    ProjectUpdate {
        update_type: String,
        data: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    TaskUpdate { task: serde_json::Value },
    UserPresence {
        user_id: String,
        user_name: String,
        status: String,
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_join_chat() {
        let raw = json!({"type": "joinChat", "projectId": "p1"}).to_string();
        match serde_json::from_str::<ClientEvent>(&raw).unwrap() {
            ClientEvent::JoinChat { project_id } => assert_eq!(project_id, "p1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parses_send_message() {
        let raw = json!({"type": "sendMessage", "projectId": "p1", "content": "hi"}).to_string();
        match serde_json::from_str::<ClientEvent>(&raw).unwrap() {
            ClientEvent::SendMessage { project_id, content } => {
                assert_eq!(project_id, "p1");
                assert_eq!(content, "hi");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parses_whiteboard_shape() {
        let raw = json!({
            "type": "whiteboardShape",
            "projectId": "p1",
            "shape": {
                "id": "s1",
                "type": "rect",
                "position": {"x": 10.0, "y": 20.0},
                "dimensions": {"width": 100.0, "height": 50.0},
                "style": {"stroke": "#000000", "strokeWidth": 2.0}
            }
        })
        .to_string();
        match serde_json::from_str::<ClientEvent>(&raw).unwrap() {
            ClientEvent::WhiteboardShape { shape, .. } => {
                assert_eq!(shape.id, "s1");
                assert_eq!(shape.kind, crate::models::ShapeKind::Rect);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_event() {
        let raw = json!({"type": "hijack", "projectId": "p1"}).to_string();
        assert!(serde_json::from_str::<ClientEvent>(&raw).is_err());
    }

    #[test]
    fn rejects_missing_required_field() {
        let raw = json!({"type": "sendMessage", "projectId": "p1"}).to_string();
        assert!(serde_json::from_str::<ClientEvent>(&raw).is_err());
    }

    #[test]
    fn typing_indicator_carries_ttl_on_the_wire() {
        let event = ServerEvent::TypingIndicator {
            user_id: "u1".into(),
            user_name: "Ada".into(),
            ttl_ms: 2800,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(value["type"], "typingIndicator");
        assert_eq!(value["ttlMs"], 2800);
        assert_eq!(value["userName"], "Ada");
    }

    #[test]
    fn ack_round_trips() {
        let event = ServerEvent::Ack {
            room: "chat_p1".into(),
            success: true,
        };
        let raw = serde_json::to_string(&event).unwrap();
        match serde_json::from_str::<ServerEvent>(&raw).unwrap() {
            ServerEvent::Ack { room, success } => {
                assert_eq!(room, "chat_p1");
                assert!(success);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
