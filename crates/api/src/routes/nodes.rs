use axum::routing::get;
use axum::Router;

use crate::handlers::nodes;
use crate::state::AppState;

/// Node store routes, mounted at `/nodes`.
///
/// ```text
/// GET    /                   -> list_nodes (?type=a,b&start=&end=)
/// POST   /                   -> create_node
/// GET    /{id}               -> get_node
/// PATCH  /{id}               -> update_node
/// DELETE /{id}               -> delete_node
/// GET    /{id}/intents       -> node_intents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(nodes::list_nodes).post(nodes::create_node))
        .route(
            "/{id}",
            get(nodes::get_node)
                .patch(nodes::update_node)
                .delete(nodes::delete_node),
        )
        .route("/{id}/intents", get(nodes::node_intents))
}
