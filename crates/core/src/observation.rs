//! Observation records (plant and animal sightings) attached to an entry.
//!
//! Records are owned exclusively by their parent entry and carry a
//! client-generated correlation id. Uploaded observation photos are bound to
//! records by that id rather than by array position, so reordering a list
//! client-side between photo selection and submission cannot misattach a
//! photo.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// A structured sighting note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Client-generated correlation id. Generated server-side if a client
    /// omits it, in which case no stored photo carry-over can match.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub common_name: String,

    pub scientific_name: String,

    /// Attachment store reference for the record's photo, if any.
    #[serde(default)]
    pub photo_ref: Option<String>,

    #[serde(default)]
    pub notes: String,
}

/// Validate a submitted observation list: every record needs a non-empty
/// common and scientific name.
pub fn validate_observations(kind: &'static str, records: &[ObservationRecord]) -> Result<(), CoreError> {
    for (index, record) in records.iter().enumerate() {
        if record.common_name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "{kind} observation {index}: common_name is required"
            )));
        }
        if record.scientific_name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "{kind} observation {index}: scientific_name is required"
            )));
        }
    }
    Ok(())
}

/// Resolve the photo reference for each submitted record.
///
/// Precedence per record, by correlation id:
///
/// 1. a newly uploaded photo from this submission,
/// 2. the `photo_ref` the submitted record itself declared,
/// 3. the `photo_ref` of the stored record with the same id.
///
/// Records the client dropped from the list are dropped here too; the
/// submitted list is authoritative for membership and order.
pub fn resolve_photo_refs(
    submitted: Vec<ObservationRecord>,
    uploaded: &HashMap<Uuid, String>,
    stored: &[ObservationRecord],
) -> Vec<ObservationRecord> {
    let stored_refs: HashMap<Uuid, &str> = stored
        .iter()
        .filter_map(|r| r.photo_ref.as_deref().map(|p| (r.id, p)))
        .collect();

    submitted
        .into_iter()
        .map(|mut record| {
            record.photo_ref = uploaded
                .get(&record.id)
                .cloned()
                .or(record.photo_ref)
                .or_else(|| stored_refs.get(&record.id).map(|p| p.to_string()));
            record
        })
        .collect()
}
