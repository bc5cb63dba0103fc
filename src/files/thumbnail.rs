//! Raster handles for the UI
//!
//! - Square grid thumbnails of the current crop
//! - The scaled-down source shown under the crop editor overlay

use cgmath::Vector2;
use iced::widget::image::Handle;
use image::{imageops::FilterType, RgbaImage};
use tokio::task;
use uuid::Uuid;

use super::export::{crop_square, ExportError};
use super::loader;
use crate::state::data::ImageRecord;

/// Default side of grid thumbnails
pub const THUMBNAIL_SIZE: u32 = 200;

/// A rendered grid thumbnail and the offset it was rendered with
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub id: Uuid,
    pub offset: Vector2<f32>,
    pub handle: Handle,
}

/// Render the current crop of a record as a small square
pub fn render_thumbnail(record: &ImageRecord, size: u32) -> Result<RgbaImage, ExportError> {
    let decoded = loader::decode_webp(&record.file_name, &record.bytes)?;
    Ok(crop_square(&decoded, record.offset, Some(size)))
}

/// Render the whole source scaled by `scale` (at most 1) for the editor
pub fn render_preview(record: &ImageRecord, scale: f32) -> Result<RgbaImage, ExportError> {
    let decoded = loader::decode_webp(&record.file_name, &record.bytes)?;

    if scale >= 1.0 {
        return Ok(decoded.to_rgba8());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = (
        ((record.width as f32 * scale).round() as u32).max(1),
        ((record.height as f32 * scale).round() as u32).max(1),
    );

    Ok(image::imageops::resize(&decoded.to_rgba8(), width, height, FilterType::Triangle))
}

fn to_handle(raster: RgbaImage) -> Handle {
    let (width, height) = raster.dimensions();
    Handle::from_rgba(width, height, raster.into_raw())
}

/// Generate a thumbnail for the grid
/// Returns the thumbnail, or an error message for the status line
pub async fn generate_thumbnail(record: ImageRecord, size: u32) -> Result<Thumbnail, String> {
    let (id, offset) = (record.id, record.offset);

    // Spawn blocking because decode + resample are CPU-intensive
    let square = task::spawn_blocking(move || render_thumbnail(&record, size))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| e.to_string())?;

    Ok(Thumbnail {
        id,
        offset,
        handle: to_handle(square),
    })
}

/// Decode the editor preview off the UI thread
pub async fn generate_preview(record: ImageRecord, scale: f32) -> Result<Handle, String> {
    let preview = task::spawn_blocking(move || render_preview(&record, scale))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| e.to_string())?;

    Ok(to_handle(preview))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::fixtures::webp_record;

    #[test]
    fn test_thumbnail_is_square() {
        let record = webp_record("a.webp", 64, 24);
        let thumb = render_thumbnail(&record, 32).unwrap();
        assert_eq!(thumb.dimensions(), (32, 32));
    }

    #[test]
    fn test_default_thumbnail_size() {
        let record = webp_record("wide.webp", 300, 240);
        let thumb = render_thumbnail(&record, THUMBNAIL_SIZE).unwrap();
        assert_eq!(thumb.dimensions(), (200, 200));
    }

    #[test]
    fn test_thumbnail_follows_offset() {
        let mut record = webp_record("a.webp", 64, 24);
        record.offset = Vector2::new(100.0, 0.0);

        // Natural size so pixels map 1:1: the square is pushed to the right edge
        let thumb = render_thumbnail(&record, 24).unwrap();
        assert_eq!(thumb.get_pixel(0, 0)[0], 40);
    }

    #[test]
    fn test_preview_is_scaled() {
        let record = webp_record("a.webp", 100, 40);
        assert_eq!(render_preview(&record, 0.5).unwrap().dimensions(), (50, 20));
        assert_eq!(render_preview(&record, 1.0).unwrap().dimensions(), (100, 40));
    }

    #[tokio::test]
    async fn test_generate_thumbnail_keeps_id_and_offset() {
        let mut record = webp_record("b.webp", 16, 8);
        record.offset = Vector2::new(2.0, 0.0);
        let id = record.id;

        let thumb = generate_thumbnail(record, 8).await.unwrap();
        assert_eq!(thumb.id, id);
        assert_eq!(thumb.offset, Vector2::new(2.0, 0.0));
    }

    #[tokio::test]
    async fn test_generate_preview_reports_decode_errors() {
        let record = ImageRecord::new("x.webp", std::sync::Arc::from(vec![0u8; 3]), 4, 4);
        let err = generate_preview(record, 1.0).await.unwrap_err();
        assert!(err.contains("x.webp"));
    }
}
