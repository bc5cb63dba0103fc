//! In-memory session
//!
//! The list of loaded images and which one is open in the editor.

use cgmath::Vector2;
use iced::widget::image::Handle;
use uuid::Uuid;

use super::data::ImageRecord;
use crate::crop;

/// The Session holds every image loaded since the app started.
///
/// It is a plain value owned by the application. Every mutation consumes the
/// session and returns the updated one, so there is no hidden shared state.
/// Nothing here is ever written to disk.
#[derive(Debug, Clone, Default)]
pub struct Session {
    images: Vec<ImageRecord>,
    selected: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// All images in load order
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Index of the image currently open in the editor
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.images.get(index)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.images.iter().position(|image| image.id == id)
    }

    /// Append freshly loaded images after the existing ones
    pub fn with_images(mut self, images: Vec<ImageRecord>) -> Self {
        self.images.extend(images);
        self
    }

    /// Select an image; out-of-range indices clear the selection
    pub fn with_selection(mut self, index: Option<usize>) -> Self {
        self.selected = index.filter(|&i| i < self.images.len());
        self
    }

    /// Store a new crop offset for an image.
    ///
    /// The offset is clamped to the range that actually moves the square,
    /// and the cached thumbnail is dropped since it no longer matches.
    pub fn with_offset(mut self, index: usize, offset: Vector2<f32>) -> Self {
        if let Some(image) = self.images.get_mut(index) {
            image.offset = crop::clamp_offset(image.width as f32, image.height as f32, offset);
            image.thumbnail = None;
        }
        self
    }

    /// Attach a generated thumbnail.
    ///
    /// `offset` is the offset the thumbnail was rendered with; if the image
    /// has moved on since (or is gone) the thumbnail is stale and dropped.
    pub fn with_thumbnail(mut self, id: Uuid, offset: Vector2<f32>, thumbnail: Handle) -> Self {
        if let Some(image) = self.images.iter_mut().find(|image| image.id == id) {
            if image.offset == offset {
                image.thumbnail = Some(thumbnail);
            }
        }
        self
    }

    /// Drop every image
    pub fn cleared(self) -> Self {
        Self::default()
    }
}
