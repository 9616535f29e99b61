//! Handlers for journal entry CRUD.
//!
//! Create and update are multipart requests: a `metadata` JSON part plus
//! attachment parts. Observation photos arrive in parts named
//! `plant_photo:<id>` / `animal_photo:<id>`, where `<id>` is the
//! observation record's correlation id; they are never matched by position.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use naturelog_core::access::{ensure_modify, ensure_read};
use naturelog_core::category::Category;
use naturelog_core::entry::{reject_blank, require_field};
use naturelog_core::error::CoreError;
use naturelog_core::media::{validate_photo_count, validate_video_count};
use naturelog_core::observation::{resolve_photo_refs, validate_observations, ObservationRecord};
use naturelog_core::place::normalize_place;
use naturelog_core::types::EntryId;
use naturelog_core::weather::WeatherSnapshot;
use naturelog_storage::validate_upload;
use naturelog_db::models::entry::{CreateEntry, EntryPatch, NewEntry, UpdateEntry};
use naturelog_db::repositories::EntryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: EntryId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Entry", id })
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// One uploaded file part.
struct UploadPart {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// The deconstructed multipart request body.
#[derive(Default)]
struct ParsedRequest {
    metadata: Option<String>,
    photos: Vec<UploadPart>,
    videos: Vec<UploadPart>,
    audio: Option<UploadPart>,
    plant_photos: HashMap<Uuid, UploadPart>,
    animal_photos: HashMap<Uuid, UploadPart>,
}

/// Split a multipart body into the metadata part and upload parts.
async fn parse_request(mut multipart: Multipart) -> AppResult<ParsedRequest> {
    let mut parsed = ParsedRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "metadata" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            parsed.metadata = Some(text);
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .to_vec();
        let part = UploadPart { filename, mime_type, bytes };

        match name.as_str() {
            "photos" => parsed.photos.push(part),
            "videos" => parsed.videos.push(part),
            "audio" => parsed.audio = Some(part),
            other => {
                if let Some(id) = other.strip_prefix("plant_photo:") {
                    parsed.plant_photos.insert(parse_correlation_id(id)?, part);
                } else if let Some(id) = other.strip_prefix("animal_photo:") {
                    parsed.animal_photos.insert(parse_correlation_id(id)?, part);
                }
                // Unknown parts are ignored.
            }
        }
    }

    Ok(parsed)
}

fn parse_correlation_id(raw: &str) -> AppResult<Uuid> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid observation photo id '{raw}'")))
}

/// Validate every upload before persisting any, so a rejected file never
/// leaves earlier blobs behind.
fn validate_uploads(parsed: &ParsedRequest, limit: u64) -> AppResult<()> {
    let parts = parsed
        .photos
        .iter()
        .chain(&parsed.videos)
        .chain(&parsed.audio)
        .chain(parsed.plant_photos.values())
        .chain(parsed.animal_photos.values());
    for part in parts {
        validate_upload(&part.mime_type, part.bytes.len() as u64, limit)?;
    }
    Ok(())
}

/// Store a batch of uploads under one namespace, collecting references.
async fn store_all(
    state: &AppState,
    namespace: &str,
    parts: Vec<UploadPart>,
) -> AppResult<Vec<String>> {
    let mut refs = Vec::with_capacity(parts.len());
    for part in parts {
        let stored = state
            .store
            .store(namespace, &part.filename, &part.mime_type, part.bytes)
            .await?;
        refs.push(stored.reference);
    }
    Ok(refs)
}

/// Store observation photos keyed by correlation id.
async fn store_observation_photos(
    state: &AppState,
    parts: HashMap<Uuid, UploadPart>,
) -> AppResult<HashMap<Uuid, String>> {
    let mut refs = HashMap::with_capacity(parts.len());
    for (id, part) in parts {
        let stored = state
            .store
            .store("observations", &part.filename, &part.mime_type, part.bytes)
            .await?;
        refs.insert(id, stored.reference);
    }
    Ok(refs)
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Resolve the place name for an entry. A manually typed name wins; else
/// reverse geocoding; a failed lookup yields `None` and the caller decides
/// whether that blocks the write.
async fn resolve_place(
    state: &AppState,
    submitted: Option<String>,
    coordinates: Option<naturelog_core::entry::Coordinates>,
) -> Option<String> {
    if let Some(manual) = submitted.filter(|s| !s.trim().is_empty()) {
        return Some(normalize_place(&manual));
    }
    let coords = coordinates?;
    match state.enricher.reverse_geocode(coords).await {
        Ok(place) => Some(place.display_name()),
        Err(e) => {
            tracing::warn!(error = %e, "Reverse geocoding failed; leaving place empty");
            None
        }
    }
}

/// Capture the weather snapshot at creation time; a failed lookup degrades
/// to the unavailable sentinel.
async fn capture_weather(
    state: &AppState,
    coordinates: Option<naturelog_core::entry::Coordinates>,
) -> WeatherSnapshot {
    let Some(coords) = coordinates else {
        return WeatherSnapshot::Unavailable;
    };
    match state.enricher.current_weather(coords).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Weather lookup failed; storing unavailable sentinel");
            WeatherSnapshot::Unavailable
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/entries
///
/// Create an entry from a multipart request.
pub async fn create_entry(
    user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let parsed = parse_request(multipart).await?;
    let metadata = parsed
        .metadata
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Missing 'metadata' part".into()))?;
    let input: CreateEntry = serde_json::from_str(metadata)
        .map_err(|e| AppError::BadRequest(format!("Invalid metadata JSON: {e}")))?;

    require_field("title", Some(input.title.as_str()))?;
    require_field("body_html", Some(input.body_html.as_str()))?;
    require_field("display_date", Some(input.display_date.as_str()))?;
    let category = Category::parse(&input.category)?;
    let coordinates = input.coordinates.map(|c| c.validate()).transpose()?;
    if coordinates.is_none() {
        require_field("place_name", input.place_name.as_deref())?;
    }
    validate_photo_count(parsed.photos.len())?;
    validate_video_count(parsed.videos.len())?;
    validate_observations("plant", &input.plants_observed)?;
    validate_observations("animal", &input.animals_observed)?;
    validate_uploads(&parsed, state.config.max_upload_bytes)?;

    // Every entry carries a place: a manual name, or one resolved from the
    // coordinates. When neither yields one the create is rejected, before
    // any blob is stored.
    let place_name = resolve_place(&state, input.place_name, coordinates)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Field 'place_name' is required when the submitted coordinates cannot be resolved to a place".into(),
            ))
        })?;
    let weather = capture_weather(&state, coordinates).await;

    let photo_refs = store_all(&state, "photos", parsed.photos).await?;
    let video_refs = store_all(&state, "videos", parsed.videos).await?;
    let audio_ref = match parsed.audio {
        Some(part) => {
            let stored = state
                .store
                .store("audio", &part.filename, &part.mime_type, part.bytes)
                .await?;
            Some(stored.reference)
        }
        None => None,
    };
    let plant_refs = store_observation_photos(&state, parsed.plant_photos).await?;
    let animal_refs = store_observation_photos(&state, parsed.animal_photos).await?;

    let plants_observed = resolve_photo_refs(input.plants_observed, &plant_refs, &[]);
    let animals_observed = resolve_photo_refs(input.animals_observed, &animal_refs, &[]);

    let entry = EntryRepo::create(
        &state.pool,
        NewEntry {
            author_id: user.user_id,
            author_display_name: user.display_name.clone(),
            title: input.title,
            body_html: input.body_html,
            category: category.as_str().to_string(),
            coordinates,
            place_name,
            weather,
            display_date: input.display_date,
            is_public: input.is_public,
            photo_refs,
            video_refs,
            audio_ref,
            plants_observed,
            animals_observed,
        },
    )
    .await?;

    tracing::info!(entry_id = %entry.id, author_id = %user.user_id, "Entry created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/entries
///
/// List the requester's own entries, newest first (public and private).
pub async fn list_my_entries(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let entries =
        EntryRepo::list_by_author(&state.pool, user.user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/feed
///
/// The public feed, newest first, optionally filtered by category.
pub async fn public_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> AppResult<impl IntoResponse> {
    let category = params
        .category
        .as_deref()
        .map(Category::parse)
        .transpose()?;
    let entries = EntryRepo::list_public(
        &state.pool,
        category.map(|c| c.as_str()),
        params.limit,
        params.offset,
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/entries/{id}
///
/// Fetch one entry. Reading a private entry as anyone but its author is
/// forbidden rather than not-found.
pub async fn get_entry(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_read(entry.access(), user.map(|u| u.user_id))?;

    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/entries/{id}
///
/// Merge a partial update into an entry. Omitted fields keep their stored
/// value; new uploads are appended subject to the media caps.
pub async fn update_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let stored = EntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_modify(stored.access(), user.user_id)?;

    let parsed = parse_request(multipart).await?;
    let input: UpdateEntry = match parsed.metadata.as_deref() {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| AppError::BadRequest(format!("Invalid metadata JSON: {e}")))?,
        None => UpdateEntry::default(),
    };

    // Submitted fields must be usable; omitted ones keep the stored value.
    if let Some(title) = &input.title {
        reject_blank("title", title)?;
    }
    if let Some(body) = &input.body_html {
        reject_blank("body_html", body)?;
    }
    if let Some(date) = &input.display_date {
        reject_blank("display_date", date)?;
    }
    let category = input.category.as_deref().map(Category::parse).transpose()?;
    let coordinates = input.coordinates.map(|c| c.validate()).transpose()?;
    if let Some(plants) = &input.plants_observed {
        validate_observations("plant", plants)?;
    }
    if let Some(animals) = &input.animals_observed {
        validate_observations("animal", animals)?;
    }

    // New uploads append to the stored media, still subject to the caps.
    validate_photo_count(stored.photo_refs.0.len() + parsed.photos.len())?;
    validate_video_count(stored.video_refs.0.len() + parsed.videos.len())?;
    validate_uploads(&parsed, state.config.max_upload_bytes)?;

    let photo_refs = if parsed.photos.is_empty() {
        None
    } else {
        let mut refs = stored.photo_refs.0.clone();
        refs.extend(store_all(&state, "photos", parsed.photos).await?);
        Some(refs)
    };
    let video_refs = if parsed.videos.is_empty() {
        None
    } else {
        let mut refs = stored.video_refs.0.clone();
        refs.extend(store_all(&state, "videos", parsed.videos).await?);
        Some(refs)
    };
    // A newly uploaded audio file supersedes the stored one.
    let audio_ref = match parsed.audio {
        Some(part) => {
            let saved = state
                .store
                .store("audio", &part.filename, &part.mime_type, part.bytes)
                .await?;
            Some(saved.reference)
        }
        None => None,
    };

    let plant_refs = store_observation_photos(&state, parsed.plant_photos).await?;
    let animal_refs = store_observation_photos(&state, parsed.animal_photos).await?;
    let plants_observed = merge_observations(
        input.plants_observed,
        plant_refs,
        &stored.plants_observed.0,
    );
    let animals_observed = merge_observations(
        input.animals_observed,
        animal_refs,
        &stored.animals_observed.0,
    );

    // A manually submitted place name is normalized; coordinates submitted
    // without one trigger a fresh reverse geocode. Resubmitted coordinates
    // also recapture the weather snapshot, with the same degrade rule as
    // creation; otherwise the stored snapshot is carried over.
    let place_name = if input.place_name.is_some() || coordinates.is_some() {
        resolve_place(&state, input.place_name, coordinates.or(stored.coordinates.map(|j| j.0)))
            .await
    } else {
        None
    };
    let weather = match coordinates {
        Some(_) => Some(capture_weather(&state, coordinates).await),
        None => None,
    };

    let updated = EntryRepo::update(
        &state.pool,
        id,
        EntryPatch {
            title: input.title,
            body_html: input.body_html,
            category: category.map(|c| c.as_str().to_string()),
            coordinates,
            place_name,
            weather,
            display_date: input.display_date,
            is_public: input.is_public,
            photo_refs,
            video_refs,
            audio_ref,
            plants_observed,
            animals_observed,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(entry_id = %id, author_id = %user.user_id, "Entry updated");

    Ok(Json(DataResponse { data: updated }))
}

/// Resolve the observation list for an update. The submitted list is
/// authoritative when present; uploads without a submitted list bind onto
/// the stored records by correlation id.
fn merge_observations(
    submitted: Option<Vec<ObservationRecord>>,
    uploaded: HashMap<Uuid, String>,
    stored: &[ObservationRecord],
) -> Option<Vec<ObservationRecord>> {
    match submitted {
        Some(records) => Some(resolve_photo_refs(records, &uploaded, stored)),
        None if uploaded.is_empty() => None,
        None => Some(resolve_photo_refs(stored.to_vec(), &uploaded, stored)),
    }
}

/// DELETE /api/v1/entries/{id}
///
/// Delete an entry and its embedded sub-documents.
pub async fn delete_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<impl IntoResponse> {
    let stored = EntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_modify(stored.access(), user.user_id)?;

    EntryRepo::delete(&state.pool, id).await?;

    tracing::info!(entry_id = %id, author_id = %user.user_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
