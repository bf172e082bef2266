pub mod css;
pub mod json;
pub mod png;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::Color;

pub use css::CssExporter;
pub use json::JsonExporter;
pub use png::PngExporter;

/// File formats a palette can be exported to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Screenshot with a strip of color blocks beneath it.
    #[default]
    Png,
    /// `:root` block of CSS custom properties.
    Css,
    Json,
}

impl ExportFormat {
    /// Exporter for this format. Only PNG reads the screenshot.
    pub fn exporter<'a>(self, screenshot: &'a RgbaImage) -> Box<dyn PaletteExporter + 'a> {
        match self {
            ExportFormat::Png => Box::new(PngExporter::new(screenshot)),
            ExportFormat::Css => Box::new(CssExporter),
            ExportFormat::Json => Box::new(JsonExporter::now()),
        }
    }
}

/// Trait for palette output formats.
pub trait PaletteExporter {
    /// Human-readable format name (e.g. "CSS").
    fn name(&self) -> &str;

    /// File extension without the dot.
    fn extension(&self) -> &str;

    /// Encode the palette into the file contents.
    fn render(&self, palette: &[Color]) -> Result<Vec<u8>>;

    /// Write the rendered palette to an explicit path.
    fn write_to(&self, palette: &[Color], path: &Path) -> Result<()> {
        let bytes = self.render(palette)?;
        std::fs::write(path, bytes).with_context(|| {
            format!("failed to write {} export to {}", self.name(), path.display())
        })?;
        tracing::info!(format = self.name(), path = %path.display(), "exported palette");
        Ok(())
    }

    /// Write into `dir` under a timestamped file name and return the path.
    fn export_into(&self, palette: &[Color], dir: &Path) -> Result<PathBuf> {
        let path = dir.join(export_file_name(self.extension()));
        self.write_to(palette, &path)?;
        Ok(path)
    }
}

/// `vibepalette-<unix millis>.<ext>`
pub fn export_file_name(extension: &str) -> String {
    format!(
        "vibepalette-{}.{extension}",
        chrono::Utc::now().timestamp_millis()
    )
}

/// Shareable coolors.co link for the palette.
pub fn coolors_url(palette: &[Color]) -> String {
    let hexes: Vec<String> = palette
        .iter()
        .map(|c| c.to_hex().trim_start_matches('#').to_string())
        .collect();
    format!("https://coolors.co/{}", hexes.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolors_url_joins_bare_hex() {
        let palette = [Color::new(255, 0, 0), Color::new(10, 15, 5)];
        assert_eq!(coolors_url(&palette), "https://coolors.co/FF0000-0A0F05");
    }

    #[test]
    fn export_file_name_has_extension() {
        let name = export_file_name("css");
        assert!(name.starts_with("vibepalette-"));
        assert!(name.ends_with(".css"));
    }

    #[test]
    fn exporter_for_each_format() {
        let shot = RgbaImage::new(8, 8);
        assert_eq!(ExportFormat::Png.exporter(&shot).extension(), "png");
        assert_eq!(ExportFormat::Css.exporter(&shot).extension(), "css");
        assert_eq!(ExportFormat::Json.exporter(&shot).extension(), "json");
    }

    #[test]
    fn export_into_writes_file() {
        let dir = std::env::temp_dir().join("vibepalette-test-export-into");
        std::fs::create_dir_all(&dir).unwrap();

        let palette = [Color::new(0, 0, 128)];
        let path = CssExporter.export_into(&palette, &dir).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("--navy: #000080;"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
