//! Application configuration
//!
//! Read once at startup from `<config dir>/square-cropper/config.json`
//! (e.g. ~/.config/square-cropper/config.json on Linux). The file is
//! optional and every field in it is optional; the app never writes it.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::files::thumbnail::THUMBNAIL_SIZE;
use crate::state::settings::{normalize_export_size, DEFAULT_EXPORT_SIZE};

/// Longest side of the editor preview, in logical pixels
pub const PREVIEW_MAX_SIZE: f32 = 500.0;

/// Maximum number of images taken from one load
pub const MAX_IMAGES: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup defaults
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Initial value of the export size slider
    pub default_export_size: u32,
    /// Initial state of the "maintain original size" toggle
    pub maintain_original_size: bool,
    /// Longest side of the editor preview
    pub preview_max_size: f32,
    /// Side of the grid thumbnails
    pub thumbnail_size: u32,
    /// Maximum number of images taken from one load
    pub max_images: usize,
    /// Directory the file dialogs open in
    pub last_directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_export_size: DEFAULT_EXPORT_SIZE,
            maintain_original_size: false,
            preview_max_size: PREVIEW_MAX_SIZE,
            thumbnail_size: THUMBNAIL_SIZE,
            max_images: MAX_IMAGES,
            last_directory: dirs::picture_dir().or_else(dirs::home_dir),
        }
    }
}

impl AppConfig {
    /// Where the config file is looked up
    pub fn path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("square-cropper");
        path.push("config.json");
        Some(path)
    }

    /// Parse a config document, falling back to defaults per missing field
    ///
    /// The document must be a JSON object; serde would otherwise accept a
    /// sequence for a struct.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("config must be a JSON object"));
        }

        let config: AppConfig = serde_json::from_value(value)?;
        Ok(config.normalized())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user config, logging and ignoring anything unusable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::debug!("No config directory, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("⚙️  Config: {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Pull out-of-range values back into something usable
    fn normalized(mut self) -> Self {
        self.default_export_size = normalize_export_size(self.default_export_size);
        self.preview_max_size = self.preview_max_size.clamp(100.0, 4096.0);
        self.thumbnail_size = self.thumbnail_size.clamp(32, 1024);
        self.max_images = self.max_images.max(1);
        self
    }
}
