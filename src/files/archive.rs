//! Batch export into a single ZIP
//!
//! Layout:
//!   cropped-images.zip
//!   └── cropped-images/
//!       ├── first.png
//!       └── second.png
//!
//! The archive is assembled in memory and only written once every image
//! has been exported, so a failure never leaves a partial file behind.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tokio::task;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::export::{export_png, png_file_name, ExportError};
use crate::state::data::ImageRecord;
use crate::state::settings::CropSettings;

/// Default file name offered in the save dialog
pub const ARCHIVE_NAME: &str = "cropped-images.zip";

/// The single folder inside the archive
pub const ARCHIVE_FOLDER: &str = "cropped-images";

/// Export every record and pack the PNGs into a ZIP.
///
/// Returns the archive bytes; any failing image aborts the whole batch.
pub fn build_archive(records: &[ImageRecord], settings: CropSettings) -> Result<Vec<u8>, ExportError> {
    // PNG data is already compressed
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.add_directory(format!("{}/", ARCHIVE_FOLDER), options)?;

    let mut used = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let png = export_png(record, settings)?;
        let name = unique_name(&mut used, png_file_name(&record.file_name));

        zip.start_file(format!("{}/{}", ARCHIVE_FOLDER, name), options)?;
        zip.write_all(&png)
            .map_err(|e| ExportError::Archive(e.into()))?;

        if (index + 1) % 10 == 0 {
            log::info!("⏳ Exported {}/{} images...", index + 1, records.len());
        }
    }

    Ok(zip.finish()?.into_inner())
}

/// Reserve `name` in the archive, suffixing " (2)", " (3)", ... on clashes
fn unique_name(used: &mut HashSet<String>, name: String) -> String {
    if used.insert(name.clone()) {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot..]),
        None => (name.as_str(), ""),
    };

    let mut n = 2;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Build the archive on the blocking pool and write it to `path`
/// Returns the number of images in the archive
pub async fn save_archive(
    records: Vec<ImageRecord>,
    settings: CropSettings,
    path: PathBuf,
) -> Result<usize, ExportError> {
    let count = records.len();

    let archive = task::spawn_blocking(move || build_archive(&records, settings))
        .await
        .map_err(|e| ExportError::Join(e.to_string()))??;

    tokio::fs::write(&path, archive)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    log::info!("✅ Wrote {} images to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::fixtures::webp_record;
    use std::io::Read;
    use std::sync::Arc;
    use zip::ZipArchive;

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> image::RgbaImage {
        let mut bytes = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    #[test]
    fn test_archive_layout() {
        let records = vec![webp_record("one.webp", 40, 20), webp_record("two.webp", 20, 40)];
        let bytes = build_archive(&records, CropSettings::new(128, false)).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            ["cropped-images/", "cropped-images/one.png", "cropped-images/two.png"]
        );

        assert_eq!(read_entry(&mut archive, "cropped-images/one.png").dimensions(), (128, 128));
        assert_eq!(read_entry(&mut archive, "cropped-images/two.png").dimensions(), (128, 128));
    }

    #[test]
    fn test_archive_maintain_original_size() {
        let records = vec![webp_record("a.webp", 40, 20), webp_record("b.webp", 25, 60)];
        let bytes = build_archive(&records, CropSettings::new(512, true)).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(read_entry(&mut archive, "cropped-images/a.png").dimensions(), (20, 20));
        assert_eq!(read_entry(&mut archive, "cropped-images/b.png").dimensions(), (25, 25));
    }

    #[test]
    fn test_duplicate_names_are_disambiguated() {
        let records = vec![
            webp_record("same.webp", 8, 8),
            webp_record("same.webp", 8, 8),
            webp_record("same.webp", 8, 8),
        ];
        let bytes = build_archive(&records, CropSettings::new(128, true)).unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: HashSet<_> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains("cropped-images/same.png"));
        assert!(names.contains("cropped-images/same (2).png"));
        assert!(names.contains("cropped-images/same (3).png"));
    }

    #[test]
    fn test_one_bad_image_aborts_batch() {
        let records = vec![
            webp_record("good.webp", 8, 8),
            ImageRecord::new("bad.webp", Arc::from(vec![0u8; 16]), 8, 8),
        ];

        let result = build_archive(&records, CropSettings::default());
        assert!(matches!(result, Err(ExportError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ARCHIVE_NAME);
        let records = vec![ImageRecord::new("bad.webp", Arc::from(vec![0u8; 16]), 8, 8)];

        assert!(save_archive(records, CropSettings::default(), path.clone()).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_archive_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ARCHIVE_NAME);
        let records = vec![webp_record("x.webp", 10, 10)];

        let count = save_archive(records, CropSettings::new(128, false), path.clone())
            .await
            .unwrap();

        assert_eq!(count, 1);
        let archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
