//! Square export
//!
//! Re-applies the crop geometry at full resolution, independent of whatever
//! scale the preview was shown at:
//! 1. Decode the original WebP
//! 2. Compute the crop rectangle from the ORIGINAL dimensions and stored offset
//! 3. Extract the square and resample it to the export size (unless the
//!    natural crop size is kept)
//! 4. Encode as PNG

use cgmath::Vector2;
use image::{imageops::FilterType, DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task;

use super::loader::{self, LoadError};
use crate::crop;
use crate::state::data::ImageRecord;
use crate::state::settings::CropSettings;

/// Shown for any export failure
pub const EXPORT_FAILED: &str = "An error occurred during export. Please try again.";

/// Errors that abort an export (single or batch)
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Archive assembly failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<LoadError> for ExportError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Decode { name, source } => ExportError::Decode { name, source },
            LoadError::Io { path, source } => ExportError::Io { path, source },
            LoadError::Join(msg) => ExportError::Join(msg),
        }
    }
}

/// Crop the largest square (shifted by `offset`) out of a full-resolution
/// image and optionally resample it to `target` x `target`.
pub fn crop_square(image: &DynamicImage, offset: Vector2<f32>, target: Option<u32>) -> RgbaImage {
    let rect = crop::pixel_crop_rect(image.width(), image.height(), offset);
    let square = image.crop_imm(rect.x, rect.y, rect.size, rect.size).to_rgba8();

    match target {
        Some(side) if side != rect.size => {
            image::imageops::resize(&square, side, side, FilterType::Lanczos3)
        }
        _ => square,
    }
}

/// Encode a raster as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(ExportError::Encode)?;
    Ok(bytes)
}

/// Full export of one record: decode, crop, resample, encode
pub fn export_png(record: &ImageRecord, settings: CropSettings) -> Result<Vec<u8>, ExportError> {
    let decoded = loader::decode_webp(&record.file_name, &record.bytes)?;
    let square = crop_square(&decoded, record.offset, settings.output_size());

    log::debug!(
        "Cropped {} to {}x{}",
        record.file_name,
        square.width(),
        square.height()
    );

    encode_png(&square)
}

/// Output name: the original with its extension replaced by `.png`
///
/// `photo.final.webp` becomes `photo.final.png`; a name without an
/// extension just gains one.
pub fn png_file_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name,
    };

    format!("{stem}.png")
}

/// Export one record and write it to `path`
pub async fn save_png(
    record: ImageRecord,
    settings: CropSettings,
    path: PathBuf,
) -> Result<PathBuf, ExportError> {
    // Spawn blocking because decode + resample are CPU-intensive
    let png = task::spawn_blocking(move || export_png(&record, settings))
        .await
        .map_err(|e| ExportError::Join(e.to_string()))??;

    tokio::fs::write(&path, png)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    log::info!("💾 Saved {}", path.display());
    Ok(path)
}
