use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No caller identity, or the presented identity could not be verified.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The entity does not exist or belongs to someone else. The two cases
    /// are reported identically so callers cannot probe for existence.
    #[error("{entity} with id {id} not found")]
    NotFoundOrUnauthorized { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
