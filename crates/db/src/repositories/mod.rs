//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every query over user data
//! is scoped by the owning user's id.

pub mod edge_repo;
pub mod node_repo;
pub mod user_repo;

pub use edge_repo::EdgeRepo;
pub use node_repo::NodeRepo;
pub use user_repo::UserRepo;
