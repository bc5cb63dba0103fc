//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the loading/export layer and the UI layer.

use cgmath::Vector2;
use iced::widget::image::Handle;
use std::sync::Arc;
use uuid::Uuid;

use crate::crop::{self, PixelRect};

/// Represents a single loaded WebP image
#[derive(Clone)]
pub struct ImageRecord {
    /// Unique per load, survives reordering of the session list
    pub id: Uuid,
    /// Original filename (e.g., "sprite_01.webp")
    pub file_name: String,
    /// The encoded file as read from disk, decoded again on export
    pub bytes: Arc<[u8]>,
    /// Original width in pixels
    pub width: u32,
    /// Original height in pixels
    pub height: u32,
    /// Crop offset in source pixels, relative to the centered square
    pub offset: Vector2<f32>,
    /// Cached square preview for the grid (None until generated, or after
    /// the offset changed)
    pub thumbnail: Option<Handle>,
}

impl ImageRecord {
    /// Create a record with the default (centered) crop
    pub fn new(file_name: impl Into<String>, bytes: Arc<[u8]>, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            bytes,
            width,
            height,
            offset: Vector2::new(0.0, 0.0),
            thumbnail: None,
        }
    }

    /// Current crop rectangle snapped to whole source pixels
    pub fn pixel_rect(&self) -> PixelRect {
        crop::pixel_crop_rect(self.width, self.height, self.offset)
    }
}

// The encoded bytes are large; keep them out of debug output
impl std::fmt::Debug for ImageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRecord")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("offset", &self.offset)
            .field("thumbnail", &self.thumbnail.is_some())
            .finish()
    }
}
