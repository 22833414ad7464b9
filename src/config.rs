//! Configuration persistence for snapocr settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::request::DEFAULT_VIEW_RATIO;
use crate::domain::DisplayMetrics;
use crate::ocr::tessdata::system_tessdata_dir;

/// Application configuration persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory; language data lives in its `tessdata/` subfolder
    pub data_dir: PathBuf,
    /// Where cropped captures are written
    pub cache_dir: PathBuf,
    /// Tesseract language code
    pub language: String,
    /// Capture frame height / width
    pub view_ratio: f32,
    pub margin_by_width: i32,
    pub margin_by_height: i32,
    /// Extra directory of language data to install alongside the bundled files.
    /// Defaults to the system Tesseract tessdata directory when one is found.
    pub tessdata_source: Option<PathBuf>,
    /// Tesseract page segmentation mode
    pub psm: Option<i32>,
    /// Tesseract OCR engine mode
    pub oem: Option<i32>,
    pub display: DisplayMetrics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_base(dirs::data_dir()),
            cache_dir: default_base(dirs::cache_dir()),
            language: "eng".to_string(),
            view_ratio: DEFAULT_VIEW_RATIO,
            margin_by_width: 50,
            margin_by_height: 50,
            tessdata_source: system_tessdata_dir(),
            psm: None,
            oem: None,
            display: DisplayMetrics::default(),
        }
    }
}

fn default_base(dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join(Config::APP_DIR)
}

impl Config {
    /// Directory name used under the platform config/data/cache dirs
    pub const APP_DIR: &'static str = "snapocr";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from `path` (or the default location), or return defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        match Self::read(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:#}", err);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Save configuration to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::error!("No config directory available, not saving");
            return;
        };
        if let Err(err) = self.write(&path) {
            log::error!("Failed to save config: {:#}", err);
        }
    }

    fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.language, "eng");
        assert_eq!(config.view_ratio, 0.5);
        assert_eq!((config.margin_by_width, config.margin_by_height), (50, 50));
        assert!(config.data_dir.ends_with(Config::APP_DIR));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            language: "deu".into(),
            view_ratio: 0.75,
            psm: Some(6),
            ..Config::default()
        };
        config.save(Some(&path));
        assert_eq!(Config::load(Some(&path)), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"language":"fra"}"#).unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.language, "fra");
        assert_eq!(config.margin_by_width, 50);
    }
}
