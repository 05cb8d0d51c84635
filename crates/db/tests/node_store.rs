//! Integration tests for the node store repositories.
//!
//! Exercises ownership scoping, partial-update semantics, the JSON text
//! columns, the date-range overlap policy, and edges against a real database.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use flux_core::node::{NodeProperties, NodeType, Position};
use flux_core::scheduling::DateRange;
use flux_core::types::{DbId, Timestamp};
use flux_db::models::edge::CreateEdge;
use flux_db::models::node::{CreateNode, NodeFilter, NodeOrder, UpdateNode};
use flux_db::models::user::CreateUser;
use flux_db::repositories::{EdgeRepo, NodeRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn ts(day: u32, hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn map(value: serde_json::Value) -> NodeProperties {
    value.as_object().unwrap().clone()
}

fn dated(
    node_type: NodeType,
    title: &str,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> CreateNode {
    CreateNode {
        start_date: start,
        end_date: end,
        ..CreateNode::new(node_type, title)
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_read_round_trips_json_fields(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let properties = map(json!({
        "status": "To Do",
        "priority": "Medium",
        "estimate_hours": 2.5,
        "labels": ["backend", "urgent"],
        "meta": { "source": "import", "archived": false }
    }));
    let position = Position { x: 450.0, y: 300.0 };

    let created = NodeRepo::create(
        &pool,
        owner,
        &CreateNode {
            content: Some("<p>Description...</p>".into()),
            properties: Some(properties.clone()),
            position: Some(position),
            ..CreateNode::new(NodeType::Task, "New Task")
        },
    )
    .await
    .unwrap();

    let read = NodeRepo::find_owned(&pool, created.id, owner)
        .await
        .unwrap()
        .expect("owner should read own node");

    assert_eq!(read.node_type, NodeType::Task);
    assert_eq!(read.user_id, owner);
    assert_eq!(read.properties, properties);
    assert_eq!(read.position, Some(position));
    assert_eq!(read, created);

    let raw: Option<String> = sqlx::query_scalar("SELECT properties FROM nodes WHERE id = $1")
        .bind(created.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw.unwrap()).unwrap();
    assert_eq!(stored["labels"], json!(["backend", "urgent"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unparseable_stored_json_reads_as_empty(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let node = NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Note, "Legacy"))
        .await
        .unwrap();

    sqlx::query("UPDATE nodes SET properties = 'not json', position = '{broken' WHERE id = $1")
        .bind(node.id)
        .execute(&pool)
        .await
        .unwrap();

    let read = NodeRepo::find_by_id(&pool, node.id).await.unwrap().unwrap();
    assert!(read.properties.is_empty());
    assert_eq!(read.position, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_owned_hides_other_users_nodes(pool: PgPool) {
    let alice = new_user(&pool, "alice@flux.test").await;
    let bob = new_user(&pool, "bob@flux.test").await;
    let node = NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Note, "Private"))
        .await
        .unwrap();

    assert!(NodeRepo::find_owned(&pool, node.id, bob).await.unwrap().is_none());
    assert!(NodeRepo::find_owned(&pool, node.id, alice).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_update_only_bumps_updated_at(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let created = NodeRepo::create(
        &pool,
        owner,
        &CreateNode {
            content: Some("body".into()),
            properties: Some(map(json!({ "status": "todo" }))),
            position: Some(Position { x: 1.0, y: 2.0 }),
            parent_id: Some(999),
            start_date: Some(ts(3, 9)),
            end_date: Some(ts(3, 10)),
            ..CreateNode::new(NodeType::Task, "Unchanged")
        },
    )
    .await
    .unwrap();

    let updated = NodeRepo::update(&pool, created.id, owner, &UpdateNode::default())
        .await
        .unwrap()
        .expect("owner update should succeed");

    assert!(updated.updated_at >= created.updated_at);
    let mut expected = created.clone();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_properties_wholesale(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let created = NodeRepo::create(
        &pool,
        owner,
        &CreateNode {
            properties: Some(map(json!({ "status": "todo", "priority": "high" }))),
            ..CreateNode::new(NodeType::Task, "Replace me")
        },
    )
    .await
    .unwrap();

    let updated = NodeRepo::update(
        &pool,
        created.id,
        owner,
        &UpdateNode {
            title: Some("Renamed".into()),
            properties: Some(map(json!({ "status": "done" }))),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.properties, map(json!({ "status": "done" })));
    assert!(
        !updated.properties.contains_key("priority"),
        "properties must be replaced, not merged"
    );
    assert_eq!(updated.node_type, NodeType::Task);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_by_non_owner_fail(pool: PgPool) {
    let alice = new_user(&pool, "alice@flux.test").await;
    let bob = new_user(&pool, "bob@flux.test").await;
    let node = NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Note, "Mine"))
        .await
        .unwrap();

    let patch = UpdateNode {
        title: Some("Hijacked".into()),
        ..Default::default()
    };
    assert!(NodeRepo::update(&pool, node.id, bob, &patch).await.unwrap().is_none());
    assert!(!NodeRepo::delete(&pool, node.id, bob).await.unwrap());

    // Same outcome for an id that does not exist at all.
    assert!(NodeRepo::update(&pool, node.id + 1000, bob, &patch).await.unwrap().is_none());
    assert!(!NodeRepo::delete(&pool, node.id + 1000, bob).await.unwrap());

    let still = NodeRepo::find_by_id(&pool, node.id).await.unwrap().unwrap();
    assert_eq!(still.title, "Mine");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_hard_and_orphans_children(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let project = NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Project, "Parent"))
        .await
        .unwrap();
    let task = NodeRepo::create(
        &pool,
        owner,
        &CreateNode {
            parent_id: Some(project.id),
            ..CreateNode::new(NodeType::Task, "Child")
        },
    )
    .await
    .unwrap();

    assert!(NodeRepo::delete(&pool, project.id, owner).await.unwrap());
    assert!(NodeRepo::find_by_id(&pool, project.id).await.unwrap().is_none());

    let orphan = NodeRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(orphan.parent_id, Some(project.id));
}

// ---------------------------------------------------------------------------
// Filtered listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_type_is_owner_scoped(pool: PgPool) {
    let alice = new_user(&pool, "alice@flux.test").await;
    let bob = new_user(&pool, "bob@flux.test").await;
    NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Task, "A task")).await.unwrap();
    NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Note, "A note")).await.unwrap();
    NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Project, "A project")).await.unwrap();
    NodeRepo::create(&pool, bob, &CreateNode::new(NodeType::Task, "Bob task")).await.unwrap();

    let nodes = NodeRepo::list(
        &pool,
        &NodeFilter::owned_by(alice).of_types(&[NodeType::Task, NodeType::Note]),
    )
    .await
    .unwrap();

    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["A task", "A note"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_range_filter_boundary_policy(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let inside = dated(NodeType::Event, "inside", Some(ts(3, 9)), Some(ts(3, 10)));
    let starts_inside = dated(NodeType::Event, "starts inside", Some(ts(8, 9)), Some(ts(12, 9)));
    let ends_inside = dated(NodeType::Event, "ends inside", Some(ts(1, 9)), Some(ts(2, 9)));
    let on_boundary = dated(NodeType::Event, "on boundary", Some(ts(2, 0)), None);
    let spanning = dated(NodeType::Event, "spanning", Some(ts(1, 0)), Some(ts(10, 0)));
    let outside = dated(NodeType::Event, "outside", Some(ts(20, 9)), Some(ts(20, 10)));
    let undated = dated(NodeType::Event, "undated", None, None);

    let all = [
        &inside,
        &starts_inside,
        &ends_inside,
        &on_boundary,
        &spanning,
        &outside,
        &undated,
    ];
    for input in all {
        NodeRepo::create(&pool, owner, input).await.unwrap();
    }

    let range = DateRange::new(ts(2, 0), ts(8, 23)).unwrap();
    let nodes = NodeRepo::list(
        &pool,
        &NodeFilter::owned_by(owner)
            .within(range)
            .ordered_by(NodeOrder::StartDateAsc),
    )
    .await
    .unwrap();

    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["ends inside", "on boundary", "inside", "starts inside"]);
    assert!(!titles.contains(&"spanning"), "spanning node must not match");

    for node in &nodes {
        assert!(range.selects(node.start_date, node.end_date));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_order_and_limit(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        ids.push(
            NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Note, title))
                .await
                .unwrap()
                .id,
        );
    }
    // Touch the first note so it becomes the most recently updated.
    NodeRepo::update(&pool, ids[0], owner, &UpdateNode::default()).await.unwrap();

    let recent = NodeRepo::list(
        &pool,
        &NodeFilter::owned_by(owner)
            .of_types(&[NodeType::Note])
            .ordered_by(NodeOrder::UpdatedAtDesc)
            .limit(2),
    )
    .await
    .unwrap();

    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, ids[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_first_of_type(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    assert!(NodeRepo::find_first_of_type(&pool, owner, NodeType::Availability)
        .await
        .unwrap()
        .is_none());

    let first = NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Availability, "First"))
        .await
        .unwrap();
    NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Availability, "Second"))
        .await
        .unwrap();

    let found = NodeRepo::find_first_of_type(&pool, owner, NodeType::Availability)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
}

// ---------------------------------------------------------------------------
// Concurrent meeting creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_meetings_for_same_slot_both_persist(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let slot = dated(NodeType::Meeting, "Meeting with guest", Some(ts(4, 10)), Some(ts(4, 11)));

    let (a, b) = futures::join!(
        NodeRepo::create(&pool, owner, &slot),
        NodeRepo::create(&pool, owner, &slot)
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.id, b.id);

    let filter = NodeFilter::owned_by(owner).of_types(&[NodeType::Meeting]);
    let meetings = NodeRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(meetings.len(), 2);
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edges_require_owned_endpoints(pool: PgPool) {
    let alice = new_user(&pool, "alice@flux.test").await;
    let bob = new_user(&pool, "bob@flux.test").await;
    let a1 = NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Note, "a1")).await.unwrap();
    let a2 = NodeRepo::create(&pool, alice, &CreateNode::new(NodeType::Note, "a2")).await.unwrap();
    let b1 = NodeRepo::create(&pool, bob, &CreateNode::new(NodeType::Note, "b1")).await.unwrap();

    let edge = EdgeRepo::create(&pool, alice, &CreateEdge { source_id: a1.id, target_id: a2.id })
        .await
        .unwrap()
        .expect("both endpoints owned");
    assert_eq!((edge.source_id, edge.target_id), (a1.id, a2.id));

    let cross = EdgeRepo::create(&pool, alice, &CreateEdge { source_id: a1.id, target_id: b1.id })
        .await
        .unwrap();
    assert_matches!(cross, None);

    assert_eq!(EdgeRepo::list_for_user(&pool, alice).await.unwrap(), vec![edge.clone()]);
    assert!(EdgeRepo::list_for_user(&pool, bob).await.unwrap().is_empty());

    assert!(!EdgeRepo::delete(&pool, edge.id, bob).await.unwrap());
    assert!(EdgeRepo::delete(&pool, edge.id, alice).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_node_removes_its_edges(pool: PgPool) {
    let owner = new_user(&pool, "owner@flux.test").await;
    let a = NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Note, "a")).await.unwrap();
    let b = NodeRepo::create(&pool, owner, &CreateNode::new(NodeType::Task, "b")).await.unwrap();
    EdgeRepo::create(&pool, owner, &CreateEdge { source_id: a.id, target_id: b.id })
        .await
        .unwrap()
        .unwrap();

    NodeRepo::delete(&pool, b.id, owner).await.unwrap();
    assert!(EdgeRepo::list_for_user(&pool, owner).await.unwrap().is_empty());
}
