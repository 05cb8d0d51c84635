//! Client views whose cached data goes stale when nodes change.
//!
//! Mutations publish the views they affect; connected clients refetch them.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Execution,
    Ideation,
    Scheduling,
    /// The public booking page of the given user.
    PublicBooking(DbId),
}

impl View {
    pub fn path(&self) -> String {
        match self {
            View::Dashboard => "/dashboard".to_string(),
            View::Execution => "/execution".to_string(),
            View::Ideation => "/ideation".to_string(),
            View::Scheduling => "/scheduling".to_string(),
            View::PublicBooking(user_id) => format!("/book/{user_id}"),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

/// Views refreshed after any node create, update or delete.
pub fn node_mutation_views() -> Vec<View> {
    vec![View::Dashboard, View::Execution, View::Ideation]
}

/// Views refreshed after a guest books a meeting with `owner_id`.
pub fn booking_views(owner_id: DbId) -> Vec<View> {
    let mut views = node_mutation_views();
    views.push(View::Scheduling);
    views.push(View::PublicBooking(owner_id));
    views
}

/// Views refreshed after a user changes their availability rules.
pub fn availability_views(owner_id: DbId) -> Vec<View> {
    vec![View::Scheduling, View::PublicBooking(owner_id)]
}

/// Views refreshed after a canvas edge is added or removed.
pub fn edge_views() -> Vec<View> {
    vec![View::Ideation]
}
