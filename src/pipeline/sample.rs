use image::RgbaImage;

use crate::color::{Color, Hsl};
use crate::config::PaletteConfig;
use crate::error::PaletteError;

/// Pixels with alpha below this are treated as absent.
pub const MIN_OPAQUE_ALPHA: u8 = 128;

const NEUTRAL_SATURATION: f64 = 0.1;
const BUCKET_SATURATION_FLOOR: f64 = 0.02;
const CORNER_RATIO: f64 = 0.1;
const SKY_COLUMNS: u32 = 8;
const SKY_MIN_BRIGHTNESS: f64 = 30.0;
const SKY_MAX_BRIGHTNESS: f64 = 240.0;
const SKY_MIN_SATURATION: f64 = 0.05;
const SKY_WEIGHT: usize = 3;

/// One RGBA sample from a bitmap's raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(self) -> bool {
        self.a >= MIN_OPAQUE_ALPHA
    }

    /// Mean of the three color channels.
    pub fn brightness(self) -> f64 {
        (self.r as f64 + self.g as f64 + self.b as f64) / 3.0
    }

    pub fn color(self) -> Color {
        Color::new(self.r, self.g, self.b)
    }
}

/// A pixel-addressable image the sampler can read regions from.
pub trait Bitmap {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Row-major pixels of the `w`×`h` region whose top-left is (`x`, `y`).
    /// Positions outside the bitmap read as transparent black.
    fn region_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<Pixel>;
}

impl Bitmap for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn region_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<Pixel> {
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                let pixel = self
                    .get_pixel_checked(px, py)
                    .map(|p| Pixel::new(p[0], p[1], p[2], p[3]))
                    .unwrap_or_default();
                out.push(pixel);
            }
        }
        out
    }
}

/// Run the grid, corner and sky passes and concatenate their candidates.
///
/// The result is an unordered multiset; duplicates are left for the
/// selector to resolve.
pub fn sample<B: Bitmap + ?Sized>(
    bitmap: &B,
    config: &PaletteConfig,
) -> Result<Vec<Color>, PaletteError> {
    check_dimensions(bitmap, config)?;

    let mut candidates = sample_grid(bitmap, config);
    let grid = candidates.len();
    candidates.extend(sample_corners(bitmap));
    let corners = candidates.len() - grid;
    candidates.extend(sample_sky(bitmap, config));
    let sky = candidates.len() - grid - corners;

    tracing::debug!(grid, corners, sky, "sampled candidate colors");
    Ok(candidates)
}

fn check_dimensions<B: Bitmap + ?Sized>(
    bitmap: &B,
    config: &PaletteConfig,
) -> Result<(), PaletteError> {
    let (width, height) = (bitmap.width(), bitmap.height());
    if width == 0 || height == 0 {
        return Err(PaletteError::EmptyBitmap { width, height });
    }
    let (cols, rows) = (config.grid_cols, config.grid_rows);
    if cols == 0 || rows == 0 || width / cols == 0 || height / rows == 0 {
        return Err(PaletteError::GridTooFine {
            width,
            height,
            cols,
            rows,
        });
    }
    Ok(())
}

/// Coarse per-pixel hue bucket used inside a grid cell. Index order is
/// the emission order.
fn cell_bucket(hsl: Hsl) -> usize {
    if hsl.s < NEUTRAL_SATURATION {
        return 7;
    }
    let h = hsl.h;
    if !(30.0..330.0).contains(&h) {
        0
    } else if h < 60.0 {
        1
    } else if h < 90.0 {
        2
    } else if h < 150.0 {
        3
    } else if h < 200.0 {
        4
    } else if h < 260.0 {
        5
    } else {
        6
    }
}

/// Grid pass: the most saturated pixel of every occupied hue bucket in
/// every cell that is not mostly letterbox.
pub fn sample_grid<B: Bitmap + ?Sized>(bitmap: &B, config: &PaletteConfig) -> Vec<Color> {
    let cell_width = bitmap.width() / config.grid_cols.max(1);
    let cell_height = bitmap.height() / config.grid_rows.max(1);
    let mut colors = Vec::new();

    for row in 0..config.grid_rows {
        for col in 0..config.grid_cols {
            let pixels =
                bitmap.region_pixels(col * cell_width, row * cell_height, cell_width, cell_height);
            let mut best: [Option<(Color, f64)>; 8] = [None; 8];
            let mut dark = 0usize;

            for pixel in pixels.iter().filter(|p| p.is_opaque()) {
                let brightness = pixel.brightness();
                if brightness < config.dark_pixel_threshold {
                    dark += 1;
                    continue;
                }
                if brightness > config.bright_pixel_threshold {
                    continue;
                }

                let color = pixel.color();
                let hsl = color.to_hsl_uncached();
                let slot = &mut best[cell_bucket(hsl)];
                match *slot {
                    Some((_, s)) if hsl.s <= s => {}
                    _ => *slot = Some((color, hsl.s)),
                }
            }

            if pixels.is_empty() {
                continue;
            }
            let dark_ratio = dark as f64 / pixels.len() as f64;
            if dark_ratio > config.dark_ratio_cutoff {
                tracing::trace!(row, col, dark_ratio, "skipping letterbox cell");
                continue;
            }

            colors.extend(
                best.iter()
                    .flatten()
                    .filter(|(_, s)| *s > BUCKET_SATURATION_FLOOR)
                    .map(|(color, _)| *color),
            );
        }
    }
    colors
}

/// Color of the single pixel at (`x`, `y`), alpha dropped.
pub fn pick<B: Bitmap + ?Sized>(bitmap: &B, x: u32, y: u32) -> Result<Color, PaletteError> {
    let (width, height) = (bitmap.width(), bitmap.height());
    if x >= width || y >= height {
        return Err(PaletteError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    let pixels = bitmap.region_pixels(x, y, 1, 1);
    Ok(pixels.first().copied().unwrap_or_default().color())
}

/// Corner pass: the mean opaque color of a square at each corner.
pub fn sample_corners<B: Bitmap + ?Sized>(bitmap: &B) -> Vec<Color> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let size = (width.min(height) as f64 * CORNER_RATIO).floor() as u32;
    let origins = [
        (0, 0),
        (width - size, 0),
        (0, height - size),
        (width - size, height - size),
    ];

    origins
        .iter()
        .filter_map(|&(x, y)| average_opaque(&bitmap.region_pixels(x, y, size, size)))
        .collect()
}

fn average_opaque(pixels: &[Pixel]) -> Option<Color> {
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for pixel in pixels.iter().filter(|p| p.is_opaque()) {
        r += pixel.r as u64;
        g += pixel.g as u64;
        b += pixel.b as u64;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mean = |sum: u64| (sum as f64 / count as f64).round() as u8;
    Some(Color::new(mean(r), mean(g), mean(b)))
}

/// Sky-band pass: the most saturated mid-brightness pixel of each column of
/// a horizontal band, emitted [`SKY_WEIGHT`] times so the selector's
/// saturation-biased scoring favors it.
pub fn sample_sky<B: Bitmap + ?Sized>(bitmap: &B, config: &PaletteConfig) -> Vec<Color> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let band_start = (height as f64 * config.sky_start_y_ratio.clamp(0.0, 1.0)).floor() as u32;
    let band_end = (height as f64 * config.sky_end_y_ratio.clamp(0.0, 1.0)).floor() as u32;
    let band_height = band_end.saturating_sub(band_start);
    let column_width = width / SKY_COLUMNS;
    let mut colors = Vec::new();

    for col in 0..SKY_COLUMNS {
        let pixels =
            bitmap.region_pixels(col * column_width, band_start, column_width, band_height);
        let mut best: Option<(Color, f64)> = None;

        for pixel in pixels.iter().filter(|p| p.is_opaque()) {
            let brightness = pixel.brightness();
            if !(SKY_MIN_BRIGHTNESS..=SKY_MAX_BRIGHTNESS).contains(&brightness) {
                continue;
            }
            let color = pixel.color();
            let s = color.to_hsl_uncached().s;
            match best {
                Some((_, best_s)) if s <= best_s => {}
                _ => best = Some((color, s)),
            }
        }

        if let Some((color, s)) = best {
            if s > SKY_MIN_SATURATION {
                colors.extend(std::iter::repeat(color).take(SKY_WEIGHT));
            }
        }
    }
    colors
}
