use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use palette::Srgb;
use serde::{Deserialize, Serialize};

/// Core color type used throughout the pipeline.
/// Plain sRGB u8 components; alpha never survives past sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Number of entries kept by the per-thread HSL memo.
pub const HSL_CACHE_CAPACITY: usize = 500;

thread_local! {
    static HSL_CACHE: RefCell<HslCache> = RefCell::new(HslCache::new(HSL_CACHE_CAPACITY));
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or shorthand `#rgb`, with or without the `#`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let srgb: Srgb<u8> = hex
            .trim()
            .parse()
            .with_context(|| format!("invalid hex color: {hex}"))?;
        Ok(srgb.into())
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>`.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// HSL view of this color, memoized per thread.
    pub fn to_hsl(self) -> Hsl {
        HSL_CACHE.with(|cache| cache.borrow_mut().get_or_compute(self))
    }

    /// HSL view computed directly, bypassing the memo.
    pub fn to_hsl_uncached(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: sector / 6.0 * 360.0,
            s,
            l,
        }
    }

    /// Perceptually weighted Euclidean distance, weights (2, 4, 3) on
    /// squared channel deltas.
    ///
    /// Not a strict metric, but applied consistently for deduplication,
    /// diversity selection and dictionary lookup.
    pub fn distance(self, other: Color) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (2.0 * dr * dr + 4.0 * dg * dg + 3.0 * db * db).sqrt()
    }

    /// WCAG 2.1 relative luminance.
    ///
    /// Linearizes each sRGB channel (0.03928 breakpoint), then computes the
    /// weighted sum.
    pub fn relative_luminance(self) -> f64 {
        fn linearize(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.1 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f64 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// All channels strictly above `threshold`.
    pub fn is_near_white(self, threshold: u8) -> bool {
        self.r > threshold && self.g > threshold && self.b > threshold
    }

    /// All channels strictly below `threshold`.
    pub fn is_near_black(self, threshold: u8) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }

    /// Render in one of the supported textual formats.
    pub fn format(self, format: ColorFormat) -> String {
        match format {
            ColorFormat::Hex => self.to_hex(),
            ColorFormat::Rgb => format!("rgb({}, {}, {})", self.r, self.g, self.b),
            ColorFormat::Hsl => {
                let hsl = self.to_hsl();
                format!(
                    "hsl({}, {}%, {}%)",
                    hsl.h.round(),
                    (hsl.s * 100.0).round(),
                    (hsl.l * 100.0).round()
                )
            }
        }
    }
}

impl From<Srgb<u8>> for Color {
    fn from(srgb: Srgb<u8>) -> Self {
        Self {
            r: srgb.red,
            g: srgb.green,
            b: srgb.blue,
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Textual color notations offered for display and copying.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

impl ColorFormat {
    /// The next format in display rotation (hex → rgb → hsl → hex).
    pub fn next(self) -> Self {
        match self {
            ColorFormat::Hex => ColorFormat::Rgb,
            ColorFormat::Rgb => ColorFormat::Hsl,
            ColorFormat::Hsl => ColorFormat::Hex,
        }
    }
}

/// WCAG 2.1 conformance level for a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WcagLevel {
    Aaa,
    Aa,
    AaLarge,
    Fail,
}

impl WcagLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 7.0 {
            WcagLevel::Aaa
        } else if ratio >= 4.5 {
            WcagLevel::Aa
        } else if ratio >= 3.0 {
            WcagLevel::AaLarge
        } else {
            WcagLevel::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WcagLevel::Aaa => "AAA",
            WcagLevel::Aa => "AA",
            WcagLevel::AaLarge => "AA-Large",
            WcagLevel::Fail => "Fail",
        }
    }
}

/// Coarse hue bucket used for diversity coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HueFamily {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Magenta,
    Neutral,
}

impl HueFamily {
    /// Spectrum order; the selector's coverage pass walks families in this order.
    pub const ALL: [HueFamily; 9] = [
        HueFamily::Red,
        HueFamily::Orange,
        HueFamily::Yellow,
        HueFamily::Green,
        HueFamily::Teal,
        HueFamily::Blue,
        HueFamily::Purple,
        HueFamily::Magenta,
        HueFamily::Neutral,
    ];

    /// Classify an HSL value. Anything below `min_saturation` is neutral
    /// regardless of hue.
    pub fn classify(hsl: Hsl, min_saturation: f64) -> Self {
        if hsl.s < min_saturation {
            return HueFamily::Neutral;
        }
        let h = hsl.h;
        if !(15.0..345.0).contains(&h) {
            HueFamily::Red
        } else if h < 45.0 {
            HueFamily::Orange
        } else if h < 70.0 {
            HueFamily::Yellow
        } else if h < 150.0 {
            HueFamily::Green
        } else if h < 200.0 {
            HueFamily::Teal
        } else if h < 260.0 {
            HueFamily::Blue
        } else if h < 290.0 {
            HueFamily::Purple
        } else {
            HueFamily::Magenta
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            HueFamily::Red => "red",
            HueFamily::Orange => "orange",
            HueFamily::Yellow => "yellow",
            HueFamily::Green => "green",
            HueFamily::Teal => "teal",
            HueFamily::Blue => "blue",
            HueFamily::Purple => "purple",
            HueFamily::Magenta => "magenta",
            HueFamily::Neutral => "neutral",
        }
    }
}

/// Bounded memo for RGB → HSL with first-in-first-out eviction.
///
/// Purely an accelerator: a hit returns exactly what
/// [`Color::to_hsl_uncached`] would.
#[derive(Debug)]
pub struct HslCache {
    capacity: usize,
    entries: HashMap<Color, Hsl>,
    order: VecDeque<Color>,
}

impl HslCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get_or_compute(&mut self, color: Color) -> Hsl {
        if let Some(hsl) = self.entries.get(&color) {
            return *hsl;
        }
        let hsl = color.to_hsl_uncached();
        if self.capacity == 0 {
            return hsl;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(color, hsl);
        self.order.push_back(color);
        hsl
    }

    #[cfg(test)]
    fn contains(&self, color: &Color) -> bool {
        self.entries.contains_key(color)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Drop every memoized HSL value on the current thread.
pub fn clear_hsl_cache() {
    HSL_CACHE.with(|cache| cache.borrow_mut().clear());
}

#[cfg(test)]
pub(crate) fn cached_hsl_len() -> usize {
    HSL_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{FromColor, Hsl as PaletteHsl};

    const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn hex_is_uppercase_and_padded() {
        assert_eq!(WHITE.to_hex(), "#FFFFFF");
        assert_eq!(BLACK.to_hex(), "#000000");
        assert_eq!(Color::new(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(Color::new(10, 15, 5).to_hex(), "#0A0F05");
    }

    #[test]
    fn hex_parse_accepts_both_cases() {
        let color = Color::from_hex("#ff8800").unwrap();
        assert_eq!(color, Color::new(255, 136, 0));
        assert_eq!("FF8800".parse::<Color>().unwrap(), color);
    }

    #[test]
    fn hex_invalid_input() {
        assert!(Color::from_hex("#ffff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn hex_shorthand_expands() {
        assert_eq!(Color::from_hex("#fff").unwrap(), WHITE);
        assert_eq!(Color::from_hex(" 0a0 ").unwrap(), Color::new(0, 170, 0));
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }

    #[test]
    fn achromatic_hsl_has_zero_hue_and_saturation() {
        for v in [0u8, 54, 128, 255] {
            let hsl = Color::new(v, v, v).to_hsl();
            assert_eq!(hsl.h, 0.0);
            assert_eq!(hsl.s, 0.0);
            assert!(close(hsl.l, v as f64 / 255.0));
        }
    }

    #[test]
    fn primary_hues() {
        assert!(close(Color::new(255, 0, 0).to_hsl().h, 0.0));
        assert!(close(Color::new(0, 255, 0).to_hsl().h, 120.0));
        assert!(close(Color::new(0, 0, 255).to_hsl().h, 240.0));
        assert!(close(Color::new(255, 0, 255).to_hsl().h, 300.0));

        let hsl = Color::new(255, 0, 0).to_hsl();
        assert!(close(hsl.s, 1.0));
        assert!(close(hsl.l, 0.5));
    }

    #[test]
    fn hue_stays_below_360() {
        // red-dominant with b > g wraps through the +6 sector
        let hsl = Color::new(255, 0, 1).to_hsl();
        assert!(hsl.h > 359.0 && hsl.h < 360.0, "got {}", hsl.h);
    }

    #[test]
    fn hsl_agrees_with_palette_crate() {
        let samples = [
            Color::new(200, 100, 50),
            Color::new(75, 0, 130),
            Color::new(126, 163, 138),
            Color::new(250, 128, 114),
        ];
        for color in samples {
            let ours = color.to_hsl_uncached();
            let srgb: Srgb<f64> = color.to_srgb_u8().into_format();
            let theirs: PaletteHsl<palette::encoding::Srgb, f64> = PaletteHsl::from_color(srgb);
            let hue = theirs.hue.into_positive_degrees();
            assert!((ours.h - hue).abs() < 1e-6, "{color}: {} vs {hue}", ours.h);
            assert!((ours.s - theirs.saturation).abs() < 1e-6);
            assert!((ours.l - theirs.lightness).abs() < 1e-6);
        }
    }

    #[test]
    fn cached_and_uncached_hsl_agree() {
        clear_hsl_cache();
        for r in (0..=255u8).step_by(51) {
            for g in (0..=255u8).step_by(51) {
                for b in (0..=255u8).step_by(51) {
                    let color = Color::new(r, g, b);
                    let first = color.to_hsl();
                    let second = color.to_hsl();
                    assert_eq!(first, color.to_hsl_uncached());
                    assert_eq!(second, first);
                }
            }
        }
    }

    #[test]
    fn cache_evicts_oldest_entry_first() {
        let mut cache = HslCache::new(2);
        let a = Color::new(1, 2, 3);
        let b = Color::new(4, 5, 6);
        let c = Color::new(7, 8, 9);
        cache.get_or_compute(a);
        cache.get_or_compute(b);
        cache.get_or_compute(a);
        cache.get_or_compute(c);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&a));
        assert!(cache.contains(&b));
        assert!(cache.contains(&c));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_cache_still_computes() {
        let mut cache = HslCache::new(0);
        let color = Color::new(12, 200, 99);
        assert_eq!(cache.get_or_compute(color), color.to_hsl_uncached());
        assert!(cache.is_empty());
    }

    #[test]
    fn distance_identity_and_extremes() {
        let gray = Color::new(100, 100, 100);
        assert_eq!(gray.distance(gray), 0.0);
        assert!(BLACK.distance(WHITE) > 400.0);
        assert!(close(BLACK.distance(WHITE), 255.0 * 3.0));
    }

    #[test]
    fn distance_weights_green_highest() {
        let base = Color::new(100, 100, 100);
        let dr = base.distance(Color::new(110, 100, 100));
        let dg = base.distance(Color::new(100, 110, 100));
        let db = base.distance(Color::new(100, 100, 110));
        assert!(dg > db && db > dr);
        let shifted = Color::new(110, 100, 100);
        assert!(close(base.distance(shifted), shifted.distance(base)));
    }

    #[test]
    fn contrast_ratio_black_white() {
        let ratio = Color::contrast_ratio(&BLACK, &WHITE);
        assert!((ratio - 21.0).abs() < 1e-9, "got {ratio}");
        assert_eq!(WcagLevel::from_ratio(ratio).label(), "AAA");
    }

    #[test]
    fn contrast_ratio_same_color_and_symmetry() {
        let gray = Color::new(128, 128, 128);
        assert!((Color::contrast_ratio(&gray, &gray) - 1.0).abs() < 1e-9);

        let a = Color::new(200, 50, 50);
        let b = Color::new(50, 200, 50);
        let ab = Color::contrast_ratio(&a, &b);
        let ba = Color::contrast_ratio(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn relative_luminance_bounds() {
        assert!(BLACK.relative_luminance() < 1e-12);
        assert!((WHITE.relative_luminance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wcag_level_thresholds() {
        assert_eq!(WcagLevel::from_ratio(7.0), WcagLevel::Aaa);
        assert_eq!(WcagLevel::from_ratio(6.99), WcagLevel::Aa);
        assert_eq!(WcagLevel::from_ratio(4.5), WcagLevel::Aa);
        assert_eq!(WcagLevel::from_ratio(4.49), WcagLevel::AaLarge);
        assert_eq!(WcagLevel::from_ratio(3.0), WcagLevel::AaLarge);
        assert_eq!(WcagLevel::from_ratio(2.99), WcagLevel::Fail);
    }

    #[test]
    fn formats() {
        let color = Color::new(255, 200, 100);
        assert_eq!(color.format(ColorFormat::Hex), "#FFC864");
        assert_eq!(color.format(ColorFormat::Rgb), "rgb(255, 200, 100)");
        assert_eq!(color.format(ColorFormat::Hsl), "hsl(39, 100%, 70%)");
        assert_eq!(BLACK.format(ColorFormat::Hsl), "hsl(0, 0%, 0%)");
    }

    #[test]
    fn format_rotation_cycles() {
        let start = ColorFormat::Hex;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn near_white_and_near_black() {
        assert!(Color::new(241, 241, 241).is_near_white(240));
        assert!(!Color::new(200, 200, 200).is_near_white(240));
        assert!(!Color::new(240, 255, 255).is_near_white(240));
        assert!(Color::new(19, 19, 19).is_near_black(20));
        assert!(!Color::new(19, 20, 19).is_near_black(20));
    }

    #[test]
    fn hue_family_classification() {
        let family = |c: Color| HueFamily::classify(c.to_hsl(), 0.08);
        assert_eq!(family(Color::new(255, 0, 0)), HueFamily::Red);
        assert_eq!(family(Color::new(255, 0, 10)), HueFamily::Red);
        assert_eq!(family(Color::new(255, 165, 0)), HueFamily::Orange);
        assert_eq!(family(Color::new(255, 255, 0)), HueFamily::Yellow);
        assert_eq!(family(Color::new(0, 128, 0)), HueFamily::Green);
        assert_eq!(family(Color::new(0, 128, 128)), HueFamily::Teal);
        assert_eq!(family(Color::new(0, 0, 255)), HueFamily::Blue);
        assert_eq!(family(Color::new(75, 0, 130)), HueFamily::Purple);
        assert_eq!(family(Color::new(255, 0, 255)), HueFamily::Magenta);
        assert_eq!(family(Color::new(120, 120, 125)), HueFamily::Neutral);
    }

    #[test]
    fn family_order_matches_index() {
        for (i, family) in HueFamily::ALL.iter().enumerate() {
            assert_eq!(family.index(), i);
        }
        assert_eq!(HueFamily::Neutral.name(), "neutral");
    }
}
