//! Route definitions for journal entries.
//!
//! Mounted at `/entries` by `api_routes()`.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, entries};
use crate::state::AppState;

/// Multipart create/update requests carry several media files; allow room
/// for a full set of attachments above the per-file cap.
const MULTIPART_BODY_LIMIT: usize = 100 * 1024 * 1024;

/// Entry routes.
///
/// ```text
/// GET    /                   -> list_my_entries (?limit, offset)
/// POST   /                   -> create_entry (multipart)
/// GET    /{id}               -> get_entry
/// PUT    /{id}               -> update_entry (multipart)
/// DELETE /{id}               -> delete_entry
/// GET    /{id}/comments      -> list_comments
/// POST   /{id}/comments      -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(entries::list_my_entries).post(entries::create_entry),
        )
        .route(
            "/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT))
}
