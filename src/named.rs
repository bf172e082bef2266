//! Reference dictionary of named colors and nearest-neighbor lookup.
//!
//! The table is an ordered list, scanned linearly. Order is part of the
//! contract: on equal distance the earlier entry wins, so "Cyan" shadows
//! "Aqua" and the three "Sage" tunings each keep their own neighborhood.

use crate::color::Color;

/// Default lookup radius, in [`Color::distance`] units.
pub const DEFAULT_NAME_THRESHOLD: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub color: Color,
}

impl NamedColor {
    pub const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            color: Color::new(r, g, b),
        }
    }
}

pub static NAMED_COLORS: &[NamedColor] = &[
    // Grayscale / Off-Whites
    NamedColor::new("Black", 0, 0, 0),
    NamedColor::new("White", 255, 255, 255),
    NamedColor::new("Charcoal", 54, 69, 79),
    NamedColor::new("Slate Gray", 112, 128, 144),
    NamedColor::new("Light Slate Gray", 119, 136, 153),
    NamedColor::new("Silver", 192, 192, 192),
    NamedColor::new("Cream", 255, 253, 208),
    NamedColor::new("Beige", 245, 245, 220),

    // Blues / Cyans
    NamedColor::new("Navy", 0, 0, 128),
    NamedColor::new("Midnight Blue", 25, 25, 112),
    NamedColor::new("Royal Blue", 65, 105, 225),
    NamedColor::new("Cornflower Blue", 100, 149, 237),
    NamedColor::new("Sky Blue", 135, 206, 235),
    NamedColor::new("Light Sky Blue", 135, 206, 250),
    NamedColor::new("Deep Sky Blue", 0, 191, 255),
    NamedColor::new("Azure", 240, 255, 255),
    NamedColor::new("Teal", 0, 128, 128),
    NamedColor::new("Cyan", 0, 255, 255),
    NamedColor::new("Aqua", 0, 255, 255),
    NamedColor::new("Turquoise", 64, 224, 208),
    NamedColor::new("Steel Blue", 70, 130, 180),
    NamedColor::new("Mint", 226, 253, 253),

    // Greens
    NamedColor::new("Forest Green", 34, 139, 34),
    NamedColor::new("Green", 0, 128, 0),
    NamedColor::new("Lime", 0, 255, 0),
    NamedColor::new("Lime Green", 50, 205, 50),
    NamedColor::new("Chartreuse", 127, 255, 0),
    NamedColor::new("Emerald", 80, 200, 120),
    NamedColor::new("Sea Green", 46, 139, 87),
    NamedColor::new("Olive", 128, 128, 0),
    NamedColor::new("Olive Drab", 107, 142, 35),
    NamedColor::new("Sage", 138, 154, 91),
    NamedColor::new("Sage", 188, 184, 138),
    NamedColor::new("Sage", 126, 163, 138),

    // Reds / Pinks
    NamedColor::new("Old Mauve", 124, 79, 96),
    NamedColor::new("Maroon", 128, 0, 0),
    NamedColor::new("Dark Red", 139, 0, 0),
    NamedColor::new("Red", 255, 0, 0),
    NamedColor::new("Crimson", 220, 20, 60),
    NamedColor::new("Fire Brick", 178, 34, 34),
    NamedColor::new("Indian Red", 205, 92, 92),
    NamedColor::new("Salmon", 250, 128, 114),
    NamedColor::new("Coral", 255, 127, 80),
    NamedColor::new("Tomato", 255, 99, 71),
    NamedColor::new("Orange Red", 255, 69, 0),
    NamedColor::new("Pink", 255, 192, 203),
    NamedColor::new("Hot Pink", 255, 105, 180),
    NamedColor::new("Deep Pink", 255, 20, 147),
    NamedColor::new("Rose", 255, 0, 127),
    NamedColor::new("Fuchsia", 255, 0, 255),

    // Oranges / Yellows / Browns
    NamedColor::new("Orange", 255, 165, 0),
    NamedColor::new("Dark Orange", 255, 140, 0),
    NamedColor::new("Sandy Brown", 244, 164, 96),
    NamedColor::new("Peach", 255, 218, 185),
    NamedColor::new("Terracotta", 139, 93, 79),
    NamedColor::new("Gold", 255, 215, 0),
    NamedColor::new("Bronze", 205, 127, 50),
    NamedColor::new("Golden Rod", 218, 165, 32),
    NamedColor::new("Yellow", 255, 255, 0),
    NamedColor::new("Khaki", 240, 230, 140),
    NamedColor::new("Chocolate", 210, 105, 30),
    NamedColor::new("Saddle Brown", 139, 69, 19),
    NamedColor::new("Sienna", 160, 82, 45),
    NamedColor::new("Brown", 165, 42, 42),
    NamedColor::new("Peru", 205, 133, 63),
    NamedColor::new("Burly Wood", 222, 184, 135),
    NamedColor::new("Tan", 210, 180, 140),
    NamedColor::new("Wheat", 245, 222, 179),

    // Purples / Violets
    NamedColor::new("Indigo", 75, 0, 130),
    NamedColor::new("Purple", 128, 0, 128),
    NamedColor::new("Dark Magenta", 139, 0, 139),
    NamedColor::new("Dark Violet", 148, 0, 211),
    NamedColor::new("Dark Orchid", 153, 50, 204),
    NamedColor::new("Medium Orchid", 186, 85, 211),
    NamedColor::new("Thistle", 216, 191, 216),
    NamedColor::new("Plum", 221, 160, 221),
    NamedColor::new("Violet", 238, 130, 238),
    NamedColor::new("Lavender", 230, 230, 250),
];

/// Nearest dictionary entry to `color`, if it lies within `threshold`.
pub fn nearest_named_color(color: Color, threshold: f64) -> Option<&'static str> {
    let mut best: Option<(&NamedColor, f64)> = None;
    for entry in NAMED_COLORS {
        let d = color.distance(entry.color);
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((entry, d)),
        }
    }
    best.filter(|(_, d)| *d <= threshold)
        .map(|(entry, _)| entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entries_resolve_to_their_name() {
        for (rgb, name) in [
            ((255, 0, 0), "Red"),
            ((0, 0, 128), "Navy"),
            ((75, 0, 130), "Indigo"),
            ((153, 50, 204), "Dark Orchid"),
            ((139, 93, 79), "Terracotta"),
        ] {
            let color = Color::new(rgb.0, rgb.1, rgb.2);
            assert_eq!(nearest_named_color(color, DEFAULT_NAME_THRESHOLD), Some(name));
        }
    }

    #[test]
    fn near_match_within_threshold() {
        let near_navy = Color::new(5, 5, 130);
        assert_eq!(
            nearest_named_color(near_navy, DEFAULT_NAME_THRESHOLD),
            Some("Navy")
        );
    }

    #[test]
    fn far_color_has_no_match() {
        // mid gray sits between Slate Gray and Silver, outside both radii
        let gray = Color::new(150, 150, 150);
        assert_eq!(nearest_named_color(gray, DEFAULT_NAME_THRESHOLD), None);
        assert!(nearest_named_color(gray, 1000.0).is_some());
    }

    #[test]
    fn threshold_is_inclusive() {
        // distance to Black is exactly sqrt(9 * 9^2) = 27
        let color = Color::new(9, 9, 9);
        assert_eq!(nearest_named_color(color, 27.0), Some("Black"));
        assert_eq!(nearest_named_color(color, 26.9), None);
    }

    #[test]
    fn ties_keep_dictionary_order() {
        let cyan = Color::new(0, 255, 255);
        assert_eq!(nearest_named_color(cyan, DEFAULT_NAME_THRESHOLD), Some("Cyan"));
    }

    #[test]
    fn duplicate_sage_entries_are_all_reachable() {
        let sages: Vec<_> = NAMED_COLORS.iter().filter(|e| e.name == "Sage").collect();
        assert_eq!(sages.len(), 3);
        for entry in sages {
            assert_eq!(
                nearest_named_color(entry.color, DEFAULT_NAME_THRESHOLD),
                Some("Sage")
            );
        }
    }
}
