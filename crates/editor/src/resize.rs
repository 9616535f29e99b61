//! Image resize gestures.
//!
//! Resizing an embedded image is a drag gesture: the preview width updates
//! live while the pointer moves, the aspect ratio always follows the
//! original image, and the final pixel width is committed to the document
//! only when the gesture is released. Cancelling the gesture restores the
//! pre-drag width.

use crate::document::{Block, Document, ImageBlock};

/// Minimum committed image width.
pub const MIN_IMAGE_WIDTH_PX: u32 = 80;

/// Maximum committed image width.
pub const MAX_IMAGE_WIDTH_PX: u32 = 1920;

/// An in-progress drag on one image block.
#[derive(Debug)]
pub struct ResizeGesture {
    block: usize,
    start_width: u32,
    aspect_ratio: f64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResizeError {
    #[error("Block {0} is not an image")]
    NotAnImage(usize),
}

/// A live preview of the dragged size, aspect ratio preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePreview {
    pub width_px: u32,
    pub height_px: u32,
}

impl ResizeGesture {
    /// Begin a drag on the image at `block`, showing its resize handles.
    pub fn begin(document: &mut Document, block: usize) -> Result<Self, ResizeError> {
        let image = image_at(document, block)?;
        image.handles_visible = true;
        Ok(ResizeGesture {
            block,
            start_width: image.width_px,
            aspect_ratio: image.aspect_ratio(),
        })
    }

    /// Update the live preview with the pointer's horizontal travel.
    pub fn drag(&self, document: &mut Document, delta_x: i32) -> Result<SizePreview, ResizeError> {
        let width = self.clamped_width(delta_x);
        let preview = self.preview_for(width);
        let image = image_at(document, self.block)?;
        image.preview_width = Some(width);
        Ok(preview)
    }

    /// Release the gesture: commit the final width to the document and clear
    /// the preview state.
    pub fn release(self, document: &mut Document, delta_x: i32) -> Result<SizePreview, ResizeError> {
        let width = self.clamped_width(delta_x);
        let preview = self.preview_for(width);
        let image = image_at(document, self.block)?;
        image.width_px = width;
        image.preview_width = None;
        image.handles_visible = false;
        Ok(preview)
    }

    /// Abandon the gesture without committing; the pre-drag width stands.
    pub fn cancel(self, document: &mut Document) -> Result<(), ResizeError> {
        let image = image_at(document, self.block)?;
        image.preview_width = None;
        image.handles_visible = false;
        Ok(())
    }

    fn clamped_width(&self, delta_x: i32) -> u32 {
        let width = i64::from(self.start_width) + i64::from(delta_x);
        width.clamp(i64::from(MIN_IMAGE_WIDTH_PX), i64::from(MAX_IMAGE_WIDTH_PX)) as u32
    }

    fn preview_for(&self, width: u32) -> SizePreview {
        SizePreview {
            width_px: width,
            height_px: (f64::from(width) / self.aspect_ratio).round() as u32,
        }
    }
}

fn image_at(document: &mut Document, block: usize) -> Result<&mut ImageBlock, ResizeError> {
    match document.blocks.get_mut(block) {
        Some(Block::Image(image)) => Ok(image),
        _ => Err(ResizeError::NotAnImage(block)),
    }
}
