//! Node entity model and DTOs.

use flux_core::node::{parse_position, parse_properties, NodeProperties, NodeType, Position};
use flux_core::scheduling::DateRange;
use flux_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `nodes` table with its JSON text columns decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: DbId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    pub content: Option<String>,
    pub properties: NodeProperties,
    pub position: Option<Position>,
    pub parent_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Node {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let raw_type: String = row.try_get("node_type")?;
        let node_type = raw_type
            .parse::<NodeType>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "node_type".to_string(),
                source: Box::new(e),
            })?;
        let properties: Option<String> = row.try_get("properties")?;
        let position: Option<String> = row.try_get("position")?;

        Ok(Self {
            id: row.try_get("id")?,
            node_type,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            properties: parse_properties(properties.as_deref()),
            position: parse_position(position.as_deref()),
            parent_id: row.try_get("parent_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// DTO for inserting a node. The owner is supplied separately by the caller.
#[derive(Debug, Clone)]
pub struct CreateNode {
    pub node_type: NodeType,
    pub title: String,
    pub content: Option<String>,
    pub parent_id: Option<DbId>,
    pub properties: Option<NodeProperties>,
    pub position: Option<Position>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl CreateNode {
    /// A node of `node_type` with only a title set.
    pub fn new(node_type: NodeType, title: impl Into<String>) -> Self {
        Self {
            node_type,
            title: title.into(),
            content: None,
            parent_id: None,
            properties: None,
            position: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// DTO for a partial node update.
///
/// Absent fields are left unchanged. `properties` and `position` are
/// replaced wholesale when present; keys are never merged, so a caller
/// changing one property must send the full map. There is no `node_type`
/// field: a node's type is fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNode {
    pub title: Option<String>,
    pub content: Option<String>,
    pub properties: Option<NodeProperties>,
    pub position: Option<Position>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Sort order for node listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeOrder {
    #[default]
    CreatedAtAsc,
    CreatedAtDesc,
    UpdatedAtDesc,
    StartDateAsc,
}

impl NodeOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            NodeOrder::CreatedAtAsc => "created_at ASC, id ASC",
            NodeOrder::CreatedAtDesc => "created_at DESC, id DESC",
            NodeOrder::UpdatedAtDesc => "updated_at DESC, id DESC",
            NodeOrder::StartDateAsc => "start_date ASC NULLS LAST, id ASC",
        }
    }
}

/// Criteria for [`NodeRepo::list`](crate::repositories::NodeRepo::list).
#[derive(Debug, Clone)]
pub struct NodeFilter {
    pub user_id: DbId,
    /// Restrict to these types; `None` means all types.
    pub types: Option<Vec<NodeType>>,
    /// Date window, matched with [`DateRange::selects`] semantics.
    pub range: Option<DateRange>,
    pub order: NodeOrder,
    pub limit: Option<i64>,
}

impl NodeFilter {
    /// All nodes owned by `user_id`, oldest first.
    pub fn owned_by(user_id: DbId) -> Self {
        Self {
            user_id,
            types: None,
            range: None,
            order: NodeOrder::default(),
            limit: None,
        }
    }

    pub fn of_types(mut self, types: &[NodeType]) -> Self {
        self.types = Some(types.to_vec());
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn ordered_by(mut self, order: NodeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
