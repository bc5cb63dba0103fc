/// Square crop core
///
/// - Crop rectangle computation and offset clamping (geometry.rs)
/// - Drag-to-reposition state machine (drag.rs)
///
/// Nothing in here knows about iced or decoded pixels.

pub mod geometry;
pub mod drag;

pub use geometry::{clamp_offset, compute_crop_rect, pixel_crop_rect, CropRect, PixelRect};
pub use drag::DragController;
