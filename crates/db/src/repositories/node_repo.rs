//! Repository for the `nodes` table.

use flux_core::node::{encode_position, encode_properties, NodeType};
use flux_core::types::DbId;
use sqlx::PgPool;

use crate::models::node::{CreateNode, Node, NodeFilter, UpdateNode};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, node_type, title, content, properties, position, parent_id, \
                       start_date, end_date, user_id, created_at, updated_at";

/// Provides ownership-scoped CRUD and filtered queries over nodes.
pub struct NodeRepo;

impl NodeRepo {
    /// Insert a node owned by `user_id`, returning the created row.
    ///
    /// `properties` and `position` are written as JSON text.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateNode,
    ) -> Result<Node, sqlx::Error> {
        let query = format!(
            "INSERT INTO nodes
                (node_type, title, content, properties, position, parent_id,
                 start_date, end_date, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(input.node_type.as_str())
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.properties.as_ref().map(encode_properties))
            .bind(input.position.as_ref().map(encode_position))
            .bind(input.parent_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a node by id regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Node>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1");
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a node by id only if `user_id` owns it.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The oldest node of `node_type` owned by `user_id`.
    pub async fn find_first_of_type(
        pool: &PgPool,
        user_id: DbId,
        node_type: NodeType,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nodes
             WHERE user_id = $1 AND node_type = $2
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(user_id)
            .bind(node_type.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to a node owned by `user_id`.
    ///
    /// Returns `None` when the node does not exist or has another owner.
    /// Ownership is checked in the same statement that writes. `updated_at`
    /// is always bumped, even when no field is supplied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateNode,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!(
            "UPDATE nodes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                properties = COALESCE($5, properties),
                position = COALESCE($6, position),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.properties.as_ref().map(encode_properties))
            .bind(input.position.as_ref().map(encode_position))
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a node owned by `user_id`. Returns `true` if a row was removed.
    ///
    /// Children referencing it through `parent_id` are left in place.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List nodes matching `filter`.
    ///
    /// With a date range, a node is selected when its `start_date` or its
    /// `end_date` falls inside the inclusive range; a node spanning the whole
    /// range with both dates outside it is not selected.
    pub async fn list(pool: &PgPool, filter: &NodeFilter) -> Result<Vec<Node>, sqlx::Error> {
        let types: Option<Vec<String>> = filter
            .types
            .as_ref()
            .map(|ts| ts.iter().map(|t| t.as_str().to_string()).collect());
        let (range_start, range_end) = match filter.range {
            Some(range) => (Some(range.start), Some(range.end)),
            None => (None, None),
        };

        let query = format!(
            "SELECT {COLUMNS} FROM nodes
             WHERE user_id = $1
               AND ($2::text[] IS NULL OR node_type = ANY($2))
               AND ($3::timestamptz IS NULL
                    OR (start_date >= $3 AND start_date <= $4::timestamptz)
                    OR (end_date >= $3 AND end_date <= $4::timestamptz))
             ORDER BY {}
             LIMIT $5",
            filter.order.sql()
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(filter.user_id)
            .bind(types)
            .bind(range_start)
            .bind(range_end)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Delete every node owned by `user_id`. Returns the number removed.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nodes WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
