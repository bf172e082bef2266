use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backends::ExportFormat;
use crate::color::ColorFormat;

/// Tuning for the sampler and selector.
///
/// Threaded explicitly into every pipeline call; nothing in the core reads
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Sampling grid columns.
    pub grid_cols: u32,
    /// Sampling grid rows.
    pub grid_rows: u32,
    /// Mean channel value below which a pixel counts as letterbox-dark.
    pub dark_pixel_threshold: f64,
    /// Mean channel value above which a pixel is ignored as blown out.
    pub bright_pixel_threshold: f64,
    /// Fraction of dark pixels above which a grid cell is skipped.
    pub dark_ratio_cutoff: f64,
    pub sky_start_y_ratio: f64,
    pub sky_end_y_ratio: f64,
    /// Channels all above this make a color near-white.
    pub white_threshold: u8,
    /// Channels all below this make a color near-black.
    pub black_threshold: u8,
    /// Saturation below which a color joins the neutral family.
    pub min_saturation_colorful: f64,
    /// Minimum pairwise distance between palette entries.
    pub min_color_distance: f64,
    /// Candidates closer than this to an earlier one are dropped.
    pub dedupe_threshold: f64,
    pub target_color_count: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            grid_cols: 10,
            grid_rows: 8,
            dark_pixel_threshold: 25.0,
            bright_pixel_threshold: 245.0,
            dark_ratio_cutoff: 0.7,
            sky_start_y_ratio: 0.15,
            sky_end_y_ratio: 0.35,
            white_threshold: 240,
            black_threshold: 20,
            min_saturation_colorful: 0.08,
            min_color_distance: 35.0,
            dedupe_threshold: 20.0,
            target_color_count: 10,
        }
    }
}

impl PaletteConfig {
    /// Read tuning overrides from a JSON file. Unlisted fields keep their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }
}

/// User preferences persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub color_format: ColorFormat,
    pub export_format: ExportFormat,
    /// Whether previews label each swatch with its value.
    pub show_labels: bool,
    pub palette: PaletteConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_format: ColorFormat::Hex,
            export_format: ExportFormat::Png,
            show_labels: true,
            palette: PaletteConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults; an
    /// unreadable or corrupt one is logged and also yields defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the application's config directory.
pub fn config_dir() -> PathBuf {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            PathBuf::from(home).join(".config")
        });
    config_home.join("vibepalette")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PaletteConfig =
            serde_json::from_str(r#"{ "grid_cols": 4, "min_color_distance": 30 }"#).unwrap();
        assert_eq!(config.grid_cols, 4);
        assert_eq!(config.min_color_distance, 30.0);
        assert_eq!(config.grid_rows, 8);
        assert_eq!(config.dedupe_threshold, 20.0);
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = temp_dir("vibepalette-test-settings");
        let path = dir.join("settings.json");

        let settings = Settings {
            color_format: ColorFormat::Hsl,
            export_format: ExportFormat::Css,
            show_labels: false,
            palette: PaletteConfig {
                target_color_count: 6,
                ..PaletteConfig::default()
            },
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_or_corrupt_settings_fall_back_to_defaults() {
        let dir = temp_dir("vibepalette-test-settings-corrupt");
        let path = dir.join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn tuning_file_errors_name_the_path() {
        let dir = temp_dir("vibepalette-test-tuning");
        let path = dir.join("tuning.json");
        std::fs::write(&path, r#"{ "grid_rows": 4 }"#).unwrap();
        assert_eq!(PaletteConfig::from_file(&path).unwrap().grid_rows, 4);

        std::fs::write(&path, "grid_rows = 4").unwrap();
        let err = PaletteConfig::from_file(&path).unwrap_err().to_string();
        assert!(err.contains("invalid config file"), "got: {err}");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn formats_serialize_lowercase() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains(r#""color_format":"hex""#));
        assert!(json.contains(r#""export_format":"png""#));
    }
}
