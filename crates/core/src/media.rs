//! Media attachment limits.
//!
//! An entry carries at most [`MAX_PHOTOS`] photo references, [`MAX_VIDEOS`]
//! video references, and a single audio reference. The limits apply to the
//! final list after an update merge, not just to newly uploaded files.

use crate::error::CoreError;

/// Maximum photo references per entry.
pub const MAX_PHOTOS: usize = 5;

/// Maximum video references per entry.
pub const MAX_VIDEOS: usize = 2;

/// Validate the photo reference list length.
pub fn validate_photo_count(count: usize) -> Result<(), CoreError> {
    if count <= MAX_PHOTOS {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Too many photos: {count} (maximum {MAX_PHOTOS})"
        )))
    }
}

/// Validate the video reference list length.
pub fn validate_video_count(count: usize) -> Result<(), CoreError> {
    if count <= MAX_VIDEOS {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Too many videos: {count} (maximum {MAX_VIDEOS})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_limit_boundary() {
        assert!(validate_photo_count(0).is_ok());
        assert!(validate_photo_count(MAX_PHOTOS).is_ok());
        assert!(validate_photo_count(MAX_PHOTOS + 1).is_err());
    }

    #[test]
    fn test_video_limit_boundary() {
        assert!(validate_video_count(MAX_VIDEOS).is_ok());
        assert!(validate_video_count(MAX_VIDEOS + 1).is_err());
    }
}
