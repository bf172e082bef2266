use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::color::Color;
use crate::config::PaletteConfig;
use crate::error::PaletteError;
use crate::pipeline::sample::{sample, Bitmap};
use crate::pipeline::select::{normalize, select_diverse_palette, SelectOptions};

/// Load a screenshot from disk as an RGBA bitmap.
pub fn load_screenshot(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. \
                 Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })?;
    Ok(img.to_rgba8())
}

/// Result of one extraction run.
///
/// `pool` holds the normalized candidates so a different count can be
/// selected later without sampling the bitmap again.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub pool: Vec<Color>,
    pub palette: Vec<Color>,
}

impl Extraction {
    /// Sample `bitmap`, normalize, and select `count` colors.
    pub fn run<B: Bitmap + ?Sized>(
        bitmap: &B,
        count: usize,
        config: &PaletteConfig,
    ) -> Result<Self, PaletteError> {
        let candidates = sample(bitmap, config)?;
        let pool = normalize(&candidates, count, config);
        let palette = select_diverse_palette(&pool, count, &SelectOptions::from(config));
        tracing::debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            pool = pool.len(),
            palette = palette.len(),
            "extracted palette"
        );
        Ok(Self { pool, palette })
    }

    /// Re-run only the diversity selection against the cached pool.
    pub fn reselect(&mut self, count: usize, config: &PaletteConfig) -> &[Color] {
        self.palette = select_diverse_palette(&self.pool, count, &SelectOptions::from(config));
        &self.palette
    }
}

/// `select(normalize(sample(bitmap)), count)` as a single call.
pub fn extract_palette<B: Bitmap + ?Sized>(
    bitmap: &B,
    count: usize,
    config: &PaletteConfig,
) -> Result<Vec<Color>, PaletteError> {
    Extraction::run(bitmap, count, config).map(|e| e.palette)
}
