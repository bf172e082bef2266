use crate::color::{Color, Hsl, HueFamily};
use crate::config::PaletteConfig;

/// Knobs for [`select_diverse_palette`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectOptions {
    pub min_saturation_colorful: f64,
    pub min_color_distance: f64,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self::from(&PaletteConfig::default())
    }
}

impl From<&PaletteConfig> for SelectOptions {
    fn from(config: &PaletteConfig) -> Self {
        Self {
            min_saturation_colorful: config.min_saturation_colorful,
            min_color_distance: config.min_color_distance,
        }
    }
}

/// Drop colors closer than `threshold` to one already kept. First seen wins.
pub fn deduplicate_colors(colors: &[Color], threshold: f64) -> Vec<Color> {
    let mut unique: Vec<Color> = Vec::new();
    for &color in colors {
        if unique.iter().all(|kept| kept.distance(color) >= threshold) {
            unique.push(color);
        }
    }
    unique
}

/// Remove near-white and near-black colors, keeping survivors in order.
pub fn filter_extreme_colors(
    colors: &[Color],
    white_threshold: u8,
    black_threshold: u8,
) -> Vec<Color> {
    colors
        .iter()
        .copied()
        .filter(|c| !c.is_near_white(white_threshold) && !c.is_near_black(black_threshold))
        .collect()
}

/// Stage A: deduplicate, then filter extremes unless that would leave fewer
/// than `count` colors, in which case the unfiltered list is kept.
pub fn normalize(candidates: &[Color], count: usize, config: &PaletteConfig) -> Vec<Color> {
    let deduplicated = deduplicate_colors(candidates, config.dedupe_threshold);
    let filtered = filter_extreme_colors(
        &deduplicated,
        config.white_threshold,
        config.black_threshold,
    );
    tracing::debug!(
        raw = candidates.len(),
        deduplicated = deduplicated.len(),
        filtered = filtered.len(),
        "normalized candidates"
    );

    if filtered.len() < count {
        tracing::debug!("not enough colors after filtering, keeping extremes");
        deduplicated
    } else {
        filtered
    }
}

/// Ranking within a hue family: favors mid lightness and high saturation.
pub fn score(hsl: Hsl) -> f64 {
    let lightness = 1.0 - ((hsl.l - 0.45).abs() * 2.0).powf(1.5);
    let saturation = (hsl.s * 1.2).min(1.0);
    let not_extreme = if hsl.l > 0.15 && hsl.l < 0.85 { 1.0 } else { 0.5 };
    lightness * 0.4 + saturation * 0.4 + not_extreme * 0.2
}

struct Candidate {
    color: Color,
    family: HueFamily,
    score: f64,
}

/// Stage B: pick up to `count` colors, one per hue family first, then the
/// best remaining by score.
///
/// Every pick stays farther than `min_color_distance` from earlier picks,
/// so the result may be shorter than `count` when the pool runs out. With
/// `count` or fewer candidates the input is returned unchanged.
pub fn select_diverse_palette(
    colors: &[Color],
    count: usize,
    options: &SelectOptions,
) -> Vec<Color> {
    if colors.len() <= count {
        return colors.to_vec();
    }

    let candidates: Vec<Candidate> = colors
        .iter()
        .map(|&color| {
            let hsl = color.to_hsl();
            Candidate {
                color,
                family: HueFamily::classify(hsl, options.min_saturation_colorful),
                score: score(hsl),
            }
        })
        .collect();

    let by_score_desc =
        |a: &usize, b: &usize| candidates[*b].score.total_cmp(&candidates[*a].score);

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); HueFamily::ALL.len()];
    for (i, candidate) in candidates.iter().enumerate() {
        buckets[candidate.family.index()].push(i);
    }
    for bucket in &mut buckets {
        bucket.sort_by(by_score_desc);
    }

    let far_enough = |selected: &[usize], i: usize| {
        selected.iter().all(|&s| {
            candidates[s].color.distance(candidates[i].color) > options.min_color_distance
        })
    };

    // Coverage: every represented family before any family repeats.
    let mut selected: Vec<usize> = Vec::with_capacity(count);
    for bucket in &buckets {
        if selected.len() >= count {
            break;
        }
        if let Some(&pick) = bucket.iter().find(|&&i| far_enough(&selected, i)) {
            selected.push(pick);
        }
    }
    let covered = selected.len();

    // Fill: best remaining regardless of family.
    if selected.len() < count {
        let mut rest: Vec<usize> = buckets.concat();
        rest.sort_by(by_score_desc);
        for i in rest {
            if selected.len() >= count {
                break;
            }
            if !selected.contains(&i) && far_enough(&selected, i) {
                selected.push(i);
            }
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        covered,
        selected = selected.len(),
        families = ?selected.iter().map(|&i| candidates[i].family.name()).collect::<Vec<_>>(),
        "selected diverse palette"
    );
    selected.into_iter().map(|i| candidates[i].color).collect()
}

/// Order a palette for display: chromatic colors by ascending hue, then
/// neutrals by ascending lightness.
pub fn sort_by_hue(palette: &mut [Color], min_saturation_colorful: f64) {
    palette.sort_by(|a, b| {
        let (ha, hb) = (a.to_hsl(), b.to_hsl());
        let neutral_a = ha.s < min_saturation_colorful;
        let neutral_b = hb.s < min_saturation_colorful;
        neutral_a
            .cmp(&neutral_b)
            .then_with(|| {
                if neutral_a {
                    ha.l.total_cmp(&hb.l)
                } else {
                    ha.h.total_cmp(&hb.h)
                }
            })
            .then_with(|| (a.r, a.g, a.b).cmp(&(b.r, b.g, b.b)))
    });
}
