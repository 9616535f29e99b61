//! Journal entry model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use naturelog_core::access::EntryAccess;
use naturelog_core::comment::Comment;
use naturelog_core::entry::Coordinates;
use naturelog_core::observation::ObservationRecord;
use naturelog_core::types::{EntryId, Timestamp, UserId};
use naturelog_core::weather::WeatherSnapshot;

/// A row from the `journal_entries` table. Media references, observations,
/// the weather snapshot, and the comment thread are JSONB sub-documents.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JournalEntry {
    pub id: EntryId,
    pub author_id: UserId,
    /// Snapshot of the author's display name at creation time.
    pub author_display_name: String,
    pub title: String,
    pub body_html: String,
    pub category: String,
    pub coordinates: Option<Json<Coordinates>>,
    pub place_name: Option<String>,
    pub weather: Json<WeatherSnapshot>,
    /// User-facing date string, shown verbatim.
    pub display_date: String,
    pub is_public: bool,
    pub photo_refs: Json<Vec<String>>,
    pub video_refs: Json<Vec<String>>,
    pub audio_ref: Option<String>,
    pub plants_observed: Json<Vec<ObservationRecord>>,
    pub animals_observed: Json<Vec<ObservationRecord>>,
    pub comments: Json<Vec<Comment>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JournalEntry {
    /// The access-control view of this entry.
    pub fn access(&self) -> EntryAccess {
        EntryAccess { author_id: self.author_id, is_public: self.is_public }
    }
}

/// The metadata part of a multipart create request, before uploads and
/// enrichment are resolved.
#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    pub title: String,
    pub body_html: String,
    pub category: String,
    pub coordinates: Option<Coordinates>,
    pub place_name: Option<String>,
    pub display_date: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub plants_observed: Vec<ObservationRecord>,
    #[serde(default)]
    pub animals_observed: Vec<ObservationRecord>,
}

/// A fully resolved entry ready for insertion: uploads stored, weather
/// captured, place name resolved, observation photo refs bound. Every new
/// entry carries a place name; resolving one is the handler's problem.
#[derive(Debug)]
pub struct NewEntry {
    pub author_id: UserId,
    pub author_display_name: String,
    pub title: String,
    pub body_html: String,
    pub category: String,
    pub coordinates: Option<Coordinates>,
    pub place_name: String,
    pub weather: WeatherSnapshot,
    pub display_date: String,
    pub is_public: bool,
    pub photo_refs: Vec<String>,
    pub video_refs: Vec<String>,
    pub audio_ref: Option<String>,
    pub plants_observed: Vec<ObservationRecord>,
    pub animals_observed: Vec<ObservationRecord>,
}

/// The metadata part of a multipart update request. Omitted fields keep
/// their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntry {
    pub title: Option<String>,
    pub body_html: Option<String>,
    pub category: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub place_name: Option<String>,
    pub display_date: Option<String>,
    pub is_public: Option<bool>,
    pub plants_observed: Option<Vec<ObservationRecord>>,
    pub animals_observed: Option<Vec<ObservationRecord>>,
}

/// A resolved column-level patch: `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub body_html: Option<String>,
    pub category: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub place_name: Option<String>,
    /// Recaptured only when coordinates were resubmitted.
    pub weather: Option<WeatherSnapshot>,
    pub display_date: Option<String>,
    pub is_public: Option<bool>,
    pub photo_refs: Option<Vec<String>>,
    pub video_refs: Option<Vec<String>>,
    pub audio_ref: Option<String>,
    pub plants_observed: Option<Vec<ObservationRecord>>,
    pub animals_observed: Option<Vec<ObservationRecord>>,
}
