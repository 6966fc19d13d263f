use crate::{SharedData, logging};
use axum::Router;
use std::sync::Arc;

pub mod swagger_main;
pub mod todo_item;
pub mod todo_list;

#[cfg(test)]
pub mod test_util;

/// Assembles every endpoint in the routing table, the API documentation, and request tracing
/// into the application router
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let routes = Router::new()
        .merge(todo_list::list_routes())
        .merge(todo_item::item_routes())
        .merge(swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(routes)
}
