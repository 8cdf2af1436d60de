//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, link_analytics_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /links`        - Create a short link
/// - `GET    /links`        - List links (paginated, searchable)
/// - `GET    /links/{id}`   - Click analytics of a link
/// - `PUT    /links/{id}`   - Replace the destination (owner or admin)
/// - `DELETE /links/{id}`   - Delete a link and its clicks (owner or admin)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(link_analytics_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
}
