use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::RatingRange;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "edupro-dashboard.json";

/// Workbook read when no settings file overrides it.
pub const DEFAULT_WORKBOOK: &str = "EduPro Online Platform.xlsx";

/// Startup settings. Every field has a default, so the file may list any
/// subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook, `.json` document, or directory of per-sheet files.
    pub workbook: PathBuf,
    /// Initial instructor-rating slider selection `[lo, hi]`.
    pub default_rating_range: [f64; 2],
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            default_rating_range: [2.5, 5.0],
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read settings from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings from `path` if it exists, defaults otherwise. A malformed
    /// file is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no {} found, using default settings", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    pub fn rating_range(&self) -> RatingRange {
        RatingRange::new(self.default_rating_range[0], self.default_rating_range[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.rating_range(), RatingRange::new(2.5, 5.0));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "workbook": "exports/platform.json" }"#).unwrap();

        let config = DashboardConfig::load_or_default(&path);
        assert_eq!(config.workbook, PathBuf::from("exports/platform.json"));
        assert_eq!(config.default_rating_range, [2.5, 5.0]);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(DashboardConfig::from_file(&path).is_err());
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }

    #[test]
    fn test_rating_range_is_normalised() {
        let config = DashboardConfig {
            default_rating_range: [6.0, 1.0],
            ..DashboardConfig::default()
        };
        let range = config.rating_range();
        assert_eq!((range.lo(), range.hi()), (1.0, 5.0));
    }
}
