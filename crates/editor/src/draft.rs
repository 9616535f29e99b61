//! Draft assembly: from an in-progress entry to the submission payload.
//!
//! [`DraftEntry::into_submission`] is the end of the authoring pipeline: it
//! validates the draft against the domain rules, cleans the document,
//! serializes the fragment, and packages attachment blobs together with the
//! structured metadata. Observation photos travel keyed by their record's
//! correlation id, never by array position.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use naturelog_core::category::Category;
use naturelog_core::entry::{require_field, Coordinates};
use naturelog_core::error::CoreError;
use naturelog_core::media::{validate_photo_count, validate_video_count};
use naturelog_core::observation::{validate_observations, ObservationRecord};

use crate::audio::AudioHandle;
use crate::document::Document;
use crate::html::to_html;
use crate::normalize::clean;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentBlob {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// An observation record paired with its (optional) photo blob.
#[derive(Debug)]
pub struct DraftObservation {
    pub record: ObservationRecord,
    pub photo: Option<AttachmentBlob>,
}

impl DraftObservation {
    pub fn new(common_name: impl Into<String>, scientific_name: impl Into<String>) -> Self {
        DraftObservation {
            record: ObservationRecord {
                id: Uuid::new_v4(),
                common_name: common_name.into(),
                scientific_name: scientific_name.into(),
                photo_ref: None,
                notes: String::new(),
            },
            photo: None,
        }
    }
}

/// Media files attached to the draft. The audio slot owns the transient
/// handle of its object URL; replacing the attachment releases the prior
/// handle before the new one is taken.
#[derive(Debug, Default)]
pub struct DraftMedia {
    pub photos: Vec<AttachmentBlob>,
    pub videos: Vec<AttachmentBlob>,
    audio: Option<(AudioHandle, AttachmentBlob)>,
}

impl DraftMedia {
    /// Attach (or supersede) the single audio file.
    pub fn set_audio(&mut self, handle: AudioHandle, blob: AttachmentBlob) {
        // Dropping the previous pair revokes its handle first.
        self.audio = None;
        self.audio = Some((handle, blob));
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio.as_ref().map(|(handle, _)| handle.object_url())
    }

    pub fn clear_audio(&mut self) {
        self.audio = None;
    }
}

/// The in-progress entry being composed.
#[derive(Debug, Default)]
pub struct DraftEntry {
    pub title: String,
    pub document: Document,
    pub category: Option<Category>,
    pub coordinates: Option<Coordinates>,
    /// Resolved place name, or whatever the user typed when geolocation was
    /// denied; manual entry never blocks submission.
    pub place_name: String,
    pub is_public: bool,
    pub display_date: String,
    pub media: DraftMedia,
    pub plants: Vec<DraftObservation>,
    pub animals: Vec<DraftObservation>,
}

/// The structured metadata part of the multipart submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionMetadata {
    pub title: String,
    pub body_html: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub place_name: String,
    pub is_public: bool,
    pub display_date: String,
    pub plants_observed: Vec<ObservationRecord>,
    pub animals_observed: Vec<ObservationRecord>,
}

/// The complete submission payload: metadata plus attachment blobs.
/// Observation photos are keyed by correlation id.
#[derive(Debug)]
pub struct EntrySubmission {
    pub metadata: SubmissionMetadata,
    pub photos: Vec<AttachmentBlob>,
    pub videos: Vec<AttachmentBlob>,
    pub audio: Option<AttachmentBlob>,
    pub plant_photos: HashMap<Uuid, AttachmentBlob>,
    pub animal_photos: HashMap<Uuid, AttachmentBlob>,
}

impl DraftEntry {
    /// Validate, clean, and package the draft.
    ///
    /// Validation runs before anything else so a rejected draft is left
    /// conceptually untouched for the user to correct and resubmit.
    pub fn into_submission(mut self) -> Result<EntrySubmission, CoreError> {
        require_field("title", Some(self.title.as_str()))?;
        require_field("place_name", Some(self.place_name.as_str()))?;
        require_field("display_date", Some(self.display_date.as_str()))?;
        let category = self
            .category
            .ok_or_else(|| CoreError::Validation("Field 'category' is required".into()))?;
        if let Some(coordinates) = self.coordinates {
            self.coordinates = Some(coordinates.validate()?);
        }
        validate_photo_count(self.media.photos.len())?;
        validate_video_count(self.media.videos.len())?;

        let plant_records: Vec<ObservationRecord> =
            self.plants.iter().map(|o| o.record.clone()).collect();
        let animal_records: Vec<ObservationRecord> =
            self.animals.iter().map(|o| o.record.clone()).collect();
        validate_observations("plant", &plant_records)?;
        validate_observations("animal", &animal_records)?;

        let report = clean(&mut self.document);
        if !report.discarded_audio.is_empty() {
            // The kept audio block is the latest one; any older attachment
            // the media set still holds for a discarded URL is released.
            if let Some(url) = self.media.audio_url() {
                if report.discarded_audio.iter().any(|d| d == url) {
                    self.media.clear_audio();
                }
            }
        }
        if self.document.is_empty() {
            return Err(CoreError::Validation("Field 'content' is required".into()));
        }
        let body_html = to_html(&self.document);

        let plant_photos = take_photos(&mut self.plants);
        let animal_photos = take_photos(&mut self.animals);

        Ok(EntrySubmission {
            metadata: SubmissionMetadata {
                title: self.title,
                body_html,
                category,
                coordinates: self.coordinates,
                place_name: self.place_name,
                is_public: self.is_public,
                display_date: self.display_date,
                plants_observed: plant_records,
                animals_observed: animal_records,
            },
            photos: self.media.photos,
            videos: self.media.videos,
            audio: self.media.audio.take().map(|(_handle, blob)| blob),
            plant_photos,
            animal_photos,
        })
    }
}

fn take_photos(observations: &mut [DraftObservation]) -> HashMap<Uuid, AttachmentBlob> {
    observations
        .iter_mut()
        .filter_map(|o| o.photo.take().map(|blob| (o.record.id, blob)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HandleRegistry;
    use crate::document::Document;

    fn blob(name: &str, mime: &str) -> AttachmentBlob {
        AttachmentBlob { filename: name.into(), mime_type: mime.into(), bytes: vec![1, 2, 3] }
    }

    fn valid_draft() -> DraftEntry {
        DraftEntry {
            title: "Herons at the weir".into(),
            document: Document::from_text(["Two grey herons fishing."]),
            category: Some(Category::Birds),
            coordinates: None,
            place_name: "Ely, Cambridgeshire".into(),
            is_public: true,
            display_date: "12 April 2025".into(),
            ..DraftEntry::default()
        }
    }

    #[test]
    fn test_valid_draft_produces_submission() {
        let submission = valid_draft().into_submission().unwrap();
        assert_eq!(submission.metadata.title, "Herons at the weir");
        assert_eq!(submission.metadata.body_html, "<p>Two grey herons fishing.</p>");
        assert_eq!(submission.metadata.category, Category::Birds);
        assert!(submission.metadata.coordinates.is_none());
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        let mut draft = valid_draft();
        draft.title = "  ".into();
        assert!(draft.into_submission().is_err());

        let mut draft = valid_draft();
        draft.category = None;
        assert!(draft.into_submission().is_err());

        let mut draft = valid_draft();
        draft.document = Document::new();
        assert!(draft.into_submission().is_err());
    }

    #[test]
    fn test_media_limits_enforced() {
        let mut draft = valid_draft();
        draft.media.photos = (0..6).map(|i| blob(&format!("p{i}.jpg"), "image/jpeg")).collect();
        assert!(draft.into_submission().is_err());

        let mut draft = valid_draft();
        draft.media.videos = (0..3).map(|i| blob(&format!("v{i}.mp4"), "video/mp4")).collect();
        assert!(draft.into_submission().is_err());
    }

    #[test]
    fn test_observation_photos_keyed_by_correlation_id() {
        let mut draft = valid_draft();
        let mut fern = DraftObservation::new("Fern", "Polypodium vulgare");
        fern.photo = Some(blob("fern.jpg", "image/jpeg"));
        let fern_id = fern.record.id;
        let moss = DraftObservation::new("Moss", "Hypnum cupressiforme");
        draft.plants = vec![fern, moss];

        let submission = draft.into_submission().unwrap();
        assert_eq!(submission.plant_photos.len(), 1);
        assert!(submission.plant_photos.contains_key(&fern_id));
        assert_eq!(submission.metadata.plants_observed.len(), 2);
    }

    #[test]
    fn test_observation_names_validated() {
        let mut draft = valid_draft();
        draft.animals = vec![DraftObservation::new("Fox", "")];
        assert!(draft.into_submission().is_err());
    }

    #[test]
    fn test_superseding_audio_releases_prior_handle() {
        let registry = HandleRegistry::new();
        let mut media = DraftMedia::default();

        let first = AudioHandle::acquire(&registry, "blob:first");
        let first_id = first.id();
        media.set_audio(first, blob("first.mp3", "audio/mpeg"));
        assert!(registry.is_live(first_id));

        let second = AudioHandle::acquire(&registry, "blob:second");
        media.set_audio(second, blob("second.mp3", "audio/mpeg"));
        assert!(!registry.is_live(first_id));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(media.audio_url(), Some("blob:second"));
    }

    #[test]
    fn test_submission_metadata_serializes_for_transport() {
        let submission = valid_draft().into_submission().unwrap();
        let json = serde_json::to_value(&submission.metadata).unwrap();
        assert_eq!(json["category"], "Birds");
        assert_eq!(json["is_public"], true);
        assert!(json.get("coordinates").is_none());
    }
}
