//! Repository for the `edges` table.

use flux_core::types::DbId;
use sqlx::PgPool;

use crate::models::edge::{CreateEdge, Edge};

const COLUMNS: &str = "id, source_id, target_id, created_at";

/// Canvas edges, scoped by the owner of their source node.
pub struct EdgeRepo;

impl EdgeRepo {
    /// Connect two nodes, both of which must be owned by `user_id`.
    ///
    /// Returns `None` when either endpoint is missing or owned by someone else.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEdge,
    ) -> Result<Option<Edge>, sqlx::Error> {
        let query = format!(
            "INSERT INTO edges (source_id, target_id)
             SELECT $1, $2
             WHERE EXISTS (SELECT 1 FROM nodes WHERE id = $1 AND user_id = $3)
               AND EXISTS (SELECT 1 FROM nodes WHERE id = $2 AND user_id = $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Edge>(&query)
            .bind(input.source_id)
            .bind(input.target_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All edges whose source node belongs to `user_id`.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Edge>, sqlx::Error> {
        sqlx::query_as::<_, Edge>(
            "SELECT e.id, e.source_id, e.target_id, e.created_at
             FROM edges e
             JOIN nodes n ON n.id = e.source_id
             WHERE n.user_id = $1
             ORDER BY e.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an edge whose source node belongs to `user_id`.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM edges e
             USING nodes n
             WHERE e.id = $1 AND n.id = e.source_id AND n.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
