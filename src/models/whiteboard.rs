use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
    Text,
    Image,
    Sticky,
    Arrow,
    Path,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShapePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A single drawn object. Geometry lives in `position`/`dimensions` or in
/// `data` (free-form, e.g. path points) depending on the tool kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardShape {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<ShapePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ShapeDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ShapeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The single whiteboard of a project. Uniqueness per project is enforced
/// by the store keying whiteboards on the project id. Mutations are shape
/// append and full clear; there is no per-shape edit or delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Whiteboard {
    pub project_id: String,
    pub name: String,
    pub shapes: Vec<WhiteboardShape>,
    pub background: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Whiteboard {
    pub fn new(project_id: &str) -> Self {
        let now = Utc::now();
        Self {
            project_id: project_id.to_string(),
            name: "Main Whiteboard".to_string(),
            shapes: Vec::new(),
            background: "#ffffff".to_string(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
