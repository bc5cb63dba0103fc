/// File handling module
///
/// This module handles:
/// - Filtering and decoding incoming WebP files (loader.rs)
/// - Generating square grid thumbnails (thumbnail.rs)
/// - Cropping, resampling and PNG encoding for export (export.rs)
/// - Packaging batch exports into a ZIP archive (archive.rs)

pub mod loader;
pub mod thumbnail;
pub mod export;
pub mod archive;

#[cfg(test)]
pub(crate) mod fixtures {
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Arc;

    use crate::state::data::ImageRecord;

    /// Lossless WebP whose red channel is `x % 256` and green channel `y % 256`
    pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255]));

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::WebP)
            .expect("encode fixture");
        bytes
    }

    pub fn webp_record(name: &str, width: u32, height: u32) -> ImageRecord {
        ImageRecord::new(name, Arc::from(webp_bytes(width, height)), width, height)
    }
}
