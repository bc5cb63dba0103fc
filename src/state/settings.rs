//! Export settings
//!
//! Built from the export panel once per export action and handed to the
//! export layer by value. Never persisted.

/// Smallest selectable export side in pixels
pub const MIN_EXPORT_SIZE: u32 = 128;
/// Largest selectable export side in pixels
pub const MAX_EXPORT_SIZE: u32 = 2048;
/// Slider step in pixels
pub const EXPORT_SIZE_STEP: u32 = 32;
/// Export side used when nothing else is configured
pub const DEFAULT_EXPORT_SIZE: u32 = 512;

/// How cropped squares are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSettings {
    /// Output side length in pixels (128 to 2048)
    pub export_size: u32,

    /// Keep the natural crop size (min(width, height)) instead of resizing
    /// to `export_size`
    pub maintain_original_size: bool,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            export_size: DEFAULT_EXPORT_SIZE,
            maintain_original_size: false,
        }
    }
}

impl CropSettings {
    /// Settings for one export; the size is clamped to the selectable range
    pub fn new(export_size: u32, maintain_original_size: bool) -> Self {
        Self {
            export_size: export_size.clamp(MIN_EXPORT_SIZE, MAX_EXPORT_SIZE),
            maintain_original_size,
        }
    }

    /// Target side for the resample step, `None` keeps the natural crop size
    pub fn output_size(&self) -> Option<u32> {
        if self.maintain_original_size {
            None
        } else {
            Some(self.export_size)
        }
    }
}

/// Clamp to the selectable range and snap to the slider step (UI and config)
pub fn normalize_export_size(size: u32) -> u32 {
    let clamped = size.clamp(MIN_EXPORT_SIZE, MAX_EXPORT_SIZE);
    let steps = (clamped - MIN_EXPORT_SIZE + EXPORT_SIZE_STEP / 2) / EXPORT_SIZE_STEP;

    (MIN_EXPORT_SIZE + steps * EXPORT_SIZE_STEP).min(MAX_EXPORT_SIZE)
}
