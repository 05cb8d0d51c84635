//! The polymorphic node model.
//!
//! Every user-facing artifact (project, task, note, event, meeting, ...) is a
//! single node row tagged with a [`NodeType`]. Type-specific data lives in an
//! open `properties` map and an optional canvas [`Position`], both persisted
//! as JSON text. Reads go through [`parse_properties`] / [`parse_position`],
//! which never fail: unreadable text degrades to "no value".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Open, schema-less properties bag attached to every node.
pub type NodeProperties = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Node type
// ---------------------------------------------------------------------------

/// Closed set of node kinds. Fixed at creation; no update path changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Project,
    Task,
    Note,
    Event,
    Meeting,
    Milestone,
    Whiteboard,
    View,
    Availability,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::Project,
        NodeType::Task,
        NodeType::Note,
        NodeType::Event,
        NodeType::Meeting,
        NodeType::Milestone,
        NodeType::Whiteboard,
        NodeType::View,
        NodeType::Availability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Project => "project",
            NodeType::Task => "task",
            NodeType::Note => "note",
            NodeType::Event => "event",
            NodeType::Meeting => "meeting",
            NodeType::Milestone => "milestone",
            NodeType::Whiteboard => "whiteboard",
            NodeType::View => "view",
            NodeType::Availability => "availability",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = NodeType::ALL.iter().map(|t| t.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid node type '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Node types shown on the ideation canvas.
pub const CANVAS_TYPES: &[NodeType] = &[NodeType::Note, NodeType::Whiteboard, NodeType::Task];

/// Node types shown on the scheduling calendar.
pub const CALENDAR_TYPES: &[NodeType] = &[
    NodeType::Task,
    NodeType::Event,
    NodeType::Milestone,
    NodeType::Meeting,
];

/// Node types that block a public booking slot.
pub const BUSY_TYPES: &[NodeType] = &[NodeType::Task, NodeType::Event, NodeType::Meeting];

/// Parse a comma-separated list of type names (`"task,event"`).
///
/// Empty segments are ignored; an unknown name is a validation error.
pub fn parse_type_list(raw: &str) -> Result<Vec<NodeType>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(NodeType::from_str)
        .collect()
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Serialized field codec
// ---------------------------------------------------------------------------

/// Serialize a properties map for storage.
pub fn encode_properties(properties: &NodeProperties) -> String {
    serde_json::Value::Object(properties.clone()).to_string()
}

/// Serialize a position for storage.
pub fn encode_position(position: &Position) -> String {
    serde_json::json!({ "x": position.x, "y": position.y }).to_string()
}

/// Decode stored properties text.
///
/// `NULL`, malformed JSON and non-object JSON all decode to an empty map.
pub fn parse_properties(raw: Option<&str>) -> NodeProperties {
    match raw.map(serde_json::from_str::<serde_json::Value>) {
        Some(Ok(serde_json::Value::Object(map))) => map,
        _ => NodeProperties::new(),
    }
}

/// Decode stored position text; anything unreadable is treated as unplaced.
pub fn parse_position(raw: Option<&str>) -> Option<Position> {
    raw.and_then(|text| serde_json::from_str(text).ok())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a node title: any non-empty string. Whitespace is kept as given.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    Ok(())
}
