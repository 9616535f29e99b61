//! Journal entry field validation and shared value types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A latitude/longitude pair attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Validate that the pair lies on the globe.
    pub fn validate(self) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoreError::Validation(format!(
                "Latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(CoreError::Validation(format!(
                "Longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(self)
    }
}

/// Require a non-empty (after trimming) text field on create.
pub fn require_field<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("Field '{field}' is required"))),
    }
}

/// Reject an empty value on update when the field was submitted at all.
/// Omitted fields keep their stored value; submitted fields must be usable.
pub fn reject_blank(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!(
            "Field '{field}' must not be blank"
        )))
    } else {
        Ok(())
    }
}
