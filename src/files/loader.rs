//! WebP loader
//!
//! Turns picked, dropped or imported files into image records:
//! 1. Skip everything whose media type is not `image/webp`
//! 2. Read the remaining files from disk
//! 3. Decode each one to learn its dimensions
//!
//! The steps run strictly in that order; dimensions are only read from a
//! successfully decoded image.

use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use walkdir::WalkDir;

use crate::state::data::ImageRecord;

/// The only accepted media type
pub const WEBP_MEDIA_TYPE: &str = "image/webp";

/// Shown when a load leaves nothing usable
pub const NO_VALID_FILES: &str = "No valid WebP files were found. Please upload WebP images only.";

/// Errors that abort a whole load
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Background task failed: {0}")]
    Join(String),
}

/// A candidate file: its name and raw contents
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result of a load operation
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Successfully decoded images, in input order
    pub images: Vec<ImageRecord>,
    /// Files skipped because they are not WebP
    pub skipped: usize,
    /// WebP files dropped because the load exceeded the image limit
    pub over_limit: usize,
}

impl LoadOutcome {
    /// The aggregate warning for this load, if any
    pub fn warning(&self) -> Option<&'static str> {
        if self.images.is_empty() {
            Some(NO_VALID_FILES)
        } else {
            None
        }
    }
}

/// Media type derived from the file name, like a browser would report it
pub fn media_type(name: &str) -> Option<&'static str> {
    ImageFormat::from_path(name).ok().map(|format| format.to_mime_type())
}

pub fn is_webp(name: &str) -> bool {
    media_type(name) == Some(WEBP_MEDIA_TYPE)
}

/// Decode WebP bytes into a full-resolution raster
pub fn decode_webp(name: &str, bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    image::load_from_memory_with_format(bytes, ImageFormat::WebP).map_err(|source| LoadError::Decode {
        name: name.to_string(),
        source,
    })
}

/// Filter, decode and wrap already-read files.
///
/// Non-WebP files are counted and skipped. A WebP file that fails to decode
/// fails the whole load.
pub fn ingest(files: Vec<SourceFile>, max_images: usize) -> Result<LoadOutcome, LoadError> {
    let mut outcome = LoadOutcome::default();

    for file in files {
        if !is_webp(&file.name) {
            log::warn!("Skipping non-WebP file: {}", file.name);
            outcome.skipped += 1;
            continue;
        }

        if outcome.images.len() >= max_images {
            outcome.over_limit += 1;
            continue;
        }

        let decoded = decode_webp(&file.name, &file.bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        log::debug!("Decoded {} ({}x{})", file.name, width, height);

        outcome
            .images
            .push(ImageRecord::new(file.name, Arc::from(file.bytes), width, height));
    }

    if outcome.over_limit > 0 {
        log::warn!(
            "Load limited to {} images, {} more ignored",
            max_images,
            outcome.over_limit
        );
    }

    Ok(outcome)
}

/// Read and ingest files from disk.
///
/// Non-WebP paths are never read. Decoding runs on the blocking pool so the
/// UI keeps responding during large loads.
pub async fn load_paths(paths: Vec<PathBuf>, max_images: usize) -> Result<LoadOutcome, LoadError> {
    let (webp, other): (Vec<_>, Vec<_>) = paths
        .into_iter()
        .partition(|path| is_webp(&file_name(path)));

    let mut files = Vec::with_capacity(webp.len());
    for path in webp.iter().take(max_images) {
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        files.push(SourceFile {
            name: file_name(path),
            bytes,
        });
    }

    let mut outcome = task::spawn_blocking(move || ingest(files, max_images))
        .await
        .map_err(|e| LoadError::Join(e.to_string()))??;

    outcome.skipped += other.len();
    outcome.over_limit += webp.len().saturating_sub(max_images);

    log::info!(
        "📥 Loaded {} images ({} skipped, {} over limit)",
        outcome.images.len(),
        outcome.skipped,
        outcome.over_limit
    );

    Ok(outcome)
}

/// Every file below `folder`, in a stable order
pub fn collect_folder(folder: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    paths
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
