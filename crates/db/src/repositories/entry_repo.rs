//! Repository for the `journal_entries` table.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use naturelog_core::comment::Comment;
use naturelog_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use naturelog_core::types::{EntryId, UserId};

use crate::models::entry::{EntryPatch, JournalEntry, NewEntry};

/// Column list for journal_entries queries.
const COLUMNS: &str = "id, author_id, author_display_name, title, body_html, category, \
    coordinates, place_name, weather, display_date, is_public, photo_refs, video_refs, \
    audio_ref, plants_observed, animals_observed, comments, created_at, updated_at";

/// Provides CRUD operations for journal entries.
pub struct EntryRepo;

impl EntryRepo {
    /// Insert a fully resolved entry, returning the created row. The id is
    /// a UUIDv7 so entries sort by creation time.
    pub async fn create(pool: &PgPool, input: NewEntry) -> Result<JournalEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO journal_entries
                (id, author_id, author_display_name, title, body_html, category, coordinates,
                 place_name, weather, display_date, is_public, photo_refs, video_refs,
                 audio_ref, plants_observed, animals_observed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(Uuid::now_v7())
            .bind(input.author_id)
            .bind(&input.author_display_name)
            .bind(&input.title)
            .bind(&input.body_html)
            .bind(&input.category)
            .bind(input.coordinates.map(Json))
            .bind(&input.place_name)
            .bind(Json(&input.weather))
            .bind(&input.display_date)
            .bind(input.is_public)
            .bind(Json(&input.photo_refs))
            .bind(Json(&input.video_refs))
            .bind(&input.audio_ref)
            .bind(Json(&input.plants_observed))
            .bind(Json(&input.animals_observed))
            .fetch_one(pool)
            .await
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntryId,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journal_entries WHERE id = $1");
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an author's entries, newest first. Includes private entries;
    /// the caller is responsible for only asking for the requester's own.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: UserId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<JournalEntry>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM journal_entries
             WHERE author_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List the public feed, newest first, optionally filtered by category.
    pub async fn list_public(
        pool: &PgPool,
        category: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<JournalEntry>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM journal_entries
             WHERE is_public = TRUE AND ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Merge a patch into an entry, returning the updated row. Columns with
    /// a `None` patch value keep their stored value.
    pub async fn update(
        pool: &PgPool,
        id: EntryId,
        patch: EntryPatch,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE journal_entries SET
                title = COALESCE($2, title),
                body_html = COALESCE($3, body_html),
                category = COALESCE($4, category),
                coordinates = COALESCE($5, coordinates),
                place_name = COALESCE($6, place_name),
                weather = COALESCE($7, weather),
                display_date = COALESCE($8, display_date),
                is_public = COALESCE($9, is_public),
                photo_refs = COALESCE($10, photo_refs),
                video_refs = COALESCE($11, video_refs),
                audio_ref = COALESCE($12, audio_ref),
                plants_observed = COALESCE($13, plants_observed),
                animals_observed = COALESCE($14, animals_observed),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.body_html)
            .bind(&patch.category)
            .bind(patch.coordinates.map(Json))
            .bind(&patch.place_name)
            .bind(patch.weather.as_ref().map(Json))
            .bind(&patch.display_date)
            .bind(patch.is_public)
            .bind(patch.photo_refs.as_ref().map(Json))
            .bind(patch.video_refs.as_ref().map(Json))
            .bind(&patch.audio_ref)
            .bind(patch.plants_observed.as_ref().map(Json))
            .bind(patch.animals_observed.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: EntryId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append one comment to an entry's thread, returning the updated row.
    pub async fn append_comment(
        pool: &PgPool,
        id: EntryId,
        comment: &Comment,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE journal_entries SET
                comments = comments || $2,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(id)
            .bind(Json(comment))
            .fetch_optional(pool)
            .await
    }
}
