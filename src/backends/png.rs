use std::io::Cursor;

use anyhow::{bail, Context, Result};
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::color::Color;

use super::PaletteExporter;

/// Separator between the screenshot and the strip, and between blocks.
pub const GAP: u32 = 4;
/// Block height relative to its width.
const BLOCK_ASPECT: f64 = 1.2;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The screenshot with a row of tall color blocks underneath, on white.
pub struct PngExporter<'a> {
    screenshot: &'a RgbaImage,
}

/// Pixel geometry of the color strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub block_width: u32,
    pub block_height: u32,
    pub x_offset: u32,
    pub y: u32,
}

impl StripLayout {
    /// Blocks share the screenshot's width; leftover pixels center the strip.
    pub fn new(width: u32, height: u32, count: u32) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let gaps = (count - 1) * GAP;
        let block_width = width.checked_sub(gaps)? / count;
        if block_width == 0 {
            return None;
        }
        let block_height = (block_width as f64 * BLOCK_ASPECT).floor() as u32;
        let used = block_width * count + gaps;
        Some(Self {
            block_width,
            block_height,
            x_offset: (width - used) / 2,
            y: height + GAP,
        })
    }

    pub fn block_x(&self, index: u32) -> u32 {
        self.x_offset + index * (self.block_width + GAP)
    }
}

impl<'a> PngExporter<'a> {
    pub fn new(screenshot: &'a RgbaImage) -> Self {
        Self { screenshot }
    }

    pub fn compose(&self, palette: &[Color]) -> Result<RgbaImage> {
        if palette.is_empty() {
            bail!("no palette to export");
        }
        let (width, height) = self.screenshot.dimensions();
        let Some(layout) = StripLayout::new(width, height, palette.len() as u32) else {
            bail!(
                "screenshot is {width}px wide, too narrow for {} color blocks",
                palette.len()
            );
        };

        let mut canvas = RgbaImage::from_pixel(width, layout.y + layout.block_height, WHITE);
        imageops::overlay(&mut canvas, self.screenshot, 0, 0);

        for (i, color) in palette.iter().enumerate() {
            let block = RgbaImage::from_pixel(
                layout.block_width,
                layout.block_height,
                Rgba([color.r, color.g, color.b, 255]),
            );
            imageops::replace(
                &mut canvas,
                &block,
                layout.block_x(i as u32) as i64,
                layout.y as i64,
            );
        }
        Ok(canvas)
    }
}

impl PaletteExporter for PngExporter<'_> {
    fn name(&self) -> &str {
        "PNG"
    }

    fn extension(&self) -> &str {
        "png"
    }

    fn render(&self, palette: &[Color]) -> Result<Vec<u8>> {
        let canvas = self.compose(palette)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed to encode palette image")?;
        Ok(bytes)
    }
}
