//! Handlers for entry comment threads.
//!
//! Comments live inside their parent entry; the thread is append-only via
//! the API. Anyone who can read the entry may comment on it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use naturelog_core::access::ensure_read;
use naturelog_core::comment::Comment;
use naturelog_core::error::CoreError;
use naturelog_core::types::EntryId;
use naturelog_db::repositories::EntryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub body: String,
}

fn not_found(id: EntryId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Entry", id })
}

/// GET /api/v1/entries/{id}/comments
///
/// List the comment thread, oldest first.
pub async fn list_comments(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_read(entry.access(), user.map(|u| u.user_id))?;

    Ok(Json(DataResponse { data: entry.comments.0 }))
}

/// POST /api/v1/entries/{id}/comments
///
/// Append a comment to the thread.
pub async fn add_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_read(entry.access(), Some(user.user_id))?;

    let comment = Comment::new(
        user.user_id,
        user.display_name.clone(),
        input.body,
        chrono::Utc::now(),
    )?;

    let updated = EntryRepo::append_comment(&state.pool, id, &comment)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(entry_id = %id, author_id = %user.user_id, "Comment added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: updated })))
}
