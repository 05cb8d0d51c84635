//! Demo workspace seeding for local development.

use flux_core::node::{NodeProperties, NodeType, Position};
use serde_json::json;
use sqlx::PgPool;

use crate::models::node::CreateNode;
use crate::models::user::{CreateUser, User};
use crate::repositories::{NodeRepo, UserRepo};

/// What [`seed_demo_workspace`] produced.
#[derive(Debug)]
pub struct SeedSummary {
    pub user: User,
    /// Nodes removed from a previous seed of the same user.
    pub cleared: u64,
    pub created: usize,
}

fn props(value: serde_json::Value) -> Option<NodeProperties> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Create (or reset) a demo user with a small project, tasks, canvas notes
/// and an event.
///
/// Re-running against the same email wipes that user's nodes first.
pub async fn seed_demo_workspace(
    pool: &PgPool,
    owner: &CreateUser,
) -> Result<SeedSummary, sqlx::Error> {
    let user = match UserRepo::find_by_email(pool, &owner.email).await? {
        Some(user) => user,
        None => UserRepo::create(pool, owner).await?,
    };
    let cleared = NodeRepo::delete_all_for_user(pool, user.id).await?;

    let project = NodeRepo::create(
        pool,
        user.id,
        &CreateNode {
            properties: props(json!({ "status": "active", "priority": "critical" })),
            ..CreateNode::new(NodeType::Project, "Flux OS Launch")
        },
    )
    .await?;

    let rest = [
        CreateNode {
            content: Some("Review all shared UI components.".into()),
            parent_id: Some(project.id),
            properties: props(json!({ "status": "todo", "priority": "high" })),
            ..CreateNode::new(NodeType::Task, "Design System Audit")
        },
        CreateNode {
            content: Some("Verify polymorphic relationships.".into()),
            parent_id: Some(project.id),
            properties: props(json!({ "status": "in-progress", "priority": "critical" })),
            ..CreateNode::new(NodeType::Task, "Database Schema Review")
        },
        CreateNode {
            content: Some("Remember to use proper indexes.".into()),
            position: Some(Position { x: 100.0, y: 100.0 }),
            ..CreateNode::new(NodeType::Note, "Architecture Scratchpad")
        },
        CreateNode {
            content: Some("- [ ] Buy Groceries\n- [ ] Schedule Dentist".into()),
            position: Some(Position { x: 300.0, y: 200.0 }),
            ..CreateNode::new(NodeType::Note, "Magic Note")
        },
        CreateNode {
            properties: props(json!({ "duration": 60 })),
            start_date: Some(chrono::Utc::now()),
            end_date: Some(chrono::Utc::now() + chrono::Duration::minutes(60)),
            ..CreateNode::new(NodeType::Event, "Sync with Engineering")
        },
    ];

    for input in &rest {
        NodeRepo::create(pool, user.id, input).await?;
    }

    tracing::info!(user_id = user.id, cleared, created = rest.len() + 1, "Demo workspace seeded");

    Ok(SeedSummary {
        user,
        cleared,
        created: rest.len() + 1,
    })
}
