pub mod entries;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entries                        create (multipart), list own
/// /entries/{id}                   get, update (multipart), delete
/// /entries/{id}/comments          list, add
/// /feed                           public feed (?category, limit, offset)
/// /categories                     category catalogue
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/entries", entries::router())
        .route("/feed", get(handlers::entries::public_feed))
        .route("/categories", get(handlers::categories::list_categories))
}
