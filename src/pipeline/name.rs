use std::collections::HashMap;

use crate::color::{Color, Hsl};
use crate::named::{nearest_named_color, DEFAULT_NAME_THRESHOLD};

/// Human-readable name for a color.
///
/// A close dictionary entry wins outright; otherwise the name is derived
/// from hue, saturation and lightness.
pub fn name_color(color: Color) -> String {
    match nearest_named_color(color, DEFAULT_NAME_THRESHOLD) {
        Some(name) => name.to_string(),
        None => procedural_name(color.to_hsl()),
    }
}

/// Name built purely from HSL: grayscale ladder, fine hue, perceptual
/// overrides, then a lightness/saturation prefix.
pub fn procedural_name(hsl: Hsl) -> String {
    if hsl.s < 0.1 {
        return grayscale_name(hsl.l).to_string();
    }

    let hue = hue_name(hsl.h);
    if let Some(name) = perceptual_override(hsl, hue) {
        return name.to_string();
    }

    format!("{}{hue}", prefix(hsl))
}

fn grayscale_name(l: f64) -> &'static str {
    if l < 0.15 {
        "Black"
    } else if l < 0.3 {
        "Charcoal"
    } else if l < 0.45 {
        "Dark Gray"
    } else if l < 0.6 {
        "Gray"
    } else if l < 0.75 {
        "Silver"
    } else if l < 0.9 {
        "Light Gray"
    } else {
        "White"
    }
}

/// One of 14 fine hue names by angle.
fn hue_name(h: f64) -> &'static str {
    if !(15.0..345.0).contains(&h) {
        "Red"
    } else if h < 30.0 {
        "Vermilion"
    } else if h < 45.0 {
        "Orange"
    } else if h < 60.0 {
        "Amber"
    } else if h < 75.0 {
        "Yellow"
    } else if h < 105.0 {
        "Lime"
    } else if h < 135.0 {
        "Green"
    } else if h < 165.0 {
        "Teal"
    } else if h < 195.0 {
        "Cyan"
    } else if h < 225.0 {
        "Sky Blue"
    } else if h < 255.0 {
        "Blue"
    } else if h < 270.0 {
        "Indigo"
    } else if h < 315.0 {
        "Purple"
    } else {
        "Magenta"
    }
}

/// Perceptual names that replace the plain hue. Bands overlap; the first
/// rule to fire wins, so the order below is load-bearing.
fn perceptual_override(hsl: Hsl, hue: &str) -> Option<&'static str> {
    let Hsl { h, s, l } = hsl;

    // earth tones ahead of the general brown family
    if (10.0..=25.0).contains(&h) && s > 0.2 && s <= 0.5 && l > 0.3 && l <= 0.6 {
        return Some("Terracotta");
    }

    if (10.0..=45.0).contains(&h) && s > 0.15 && l < 0.5 {
        if l < 0.3 {
            return Some("Dark Brown");
        }
        // vivid mid-lightness stays with its hue (dark orange)
        if !(l > 0.35 && s > 0.7) {
            return Some("Brown");
        }
    }

    if matches!(hue, "Red" | "Magenta" | "Vermilion") {
        if hue == "Vermilion" && l > 0.75 && s > 0.4 {
            return Some("Peach");
        }
        if l > 0.75 && s > 0.4 {
            return Some("Pink");
        }
        if l > 0.88 {
            return Some("Rose");
        }
        if l > 0.55 && l < 0.7 && s > 0.5 {
            return Some("Coral");
        }
        if l > 0.6 && l <= 0.8 && s > 0.6 {
            return Some("Salmon");
        }
        // red-side only, so mauves past 300° keep their hue
        if (h < 25.0 || h > 355.0) && l > 0.3 && l <= 0.7 && s > 0.2 && s <= 0.6 {
            return Some("Terracotta");
        }
        if l > 0.55 && l <= 0.7 && s > 0.3 && s <= 0.6 {
            return Some("Rosy Brown");
        }
    }

    if hue == "Red" && l > 0.65 && s > 0.6 {
        return Some("Salmon");
    }

    if matches!(hue, "Vermilion" | "Orange") {
        if l > 0.75 && s > 0.4 {
            return Some("Peach");
        }
        if l > 0.55 && l < 0.7 && s > 0.5 {
            return Some("Coral");
        }
        if l > 0.5 && l < 0.7 && s > 0.2 && s <= 0.5 {
            return Some("Tan");
        }
    }

    if hue == "Yellow" {
        if l > 0.85 {
            return Some("Beige");
        }
        if (45.0..=60.0).contains(&h) && s > 0.7 && (0.4..=0.6).contains(&l) {
            return Some("Gold");
        }
        if l < 0.4 {
            return Some("Olive");
        }
    }

    if hue == "Amber" && s > 0.7 && (0.4..=0.6).contains(&l) {
        return Some("Gold");
    }

    if matches!(hue, "Purple" | "Magenta") {
        if l > 0.65 && s > 0.4 {
            return Some("Violet");
        }
        if l > 0.65 && s > 0.2 && s <= 0.4 {
            return Some("Plum");
        }
    }

    if hue == "Blue" && l > 0.85 {
        return Some("Lavender");
    }

    if matches!(hue, "Cyan" | "Teal" | "Green") {
        if l > 0.85 && h > 150.0 {
            return Some("Mint");
        }
        if l > 0.75 && h > 170.0 {
            return Some("Powder Blue");
        }
        if (120.0..=170.0).contains(&h) && s < 0.35 && l > 0.4 {
            return Some("Sage");
        }
    }

    if hue == "Sky Blue" && s > 0.2 && s < 0.6 && l > 0.35 && l < 0.65 {
        return Some("Steel Blue");
    }

    None
}

fn prefix(hsl: Hsl) -> &'static str {
    let Hsl { s, l, .. } = hsl;
    if s < 0.3 && (0.25..=0.75).contains(&l) {
        return "Muted ";
    }
    if l < 0.25 {
        "Deep "
    } else if l < 0.4 {
        "Dark "
    } else if l > 0.75 {
        "Light "
    } else if l > 0.6 && s < 0.4 {
        "Pale "
    } else {
        ""
    }
}

/// CSS custom-property form of a color name: lowercase, whitespace runs to
/// hyphens, anything else outside `[a-z0-9-]` dropped.
pub fn color_name_to_var_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_space = false;
    for ch in lower.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// One variable name per palette entry, numbered `-1`, `-2`, … when a name
/// occurs more than once.
pub fn generate_css_var_names(palette: &[Color]) -> Vec<String> {
    let bases: Vec<String> = palette
        .iter()
        .map(|&c| color_name_to_var_name(&name_color(c)))
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *totals.entry(base.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    bases
        .iter()
        .map(|base| {
            let n = seen.entry(base.as_str()).or_default();
            *n += 1;
            if totals[base.as_str()] > 1 {
                format!("{base}-{n}")
            } else {
                base.clone()
            }
        })
        .collect()
}
