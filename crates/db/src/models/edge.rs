//! Canvas edge model and DTOs.

use flux_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `edges` table: a directed visual link between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Edge {
    pub id: DbId,
    pub source_id: DbId,
    pub target_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for connecting two canvas nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEdge {
    pub source_id: DbId,
    pub target_id: DbId,
}
