use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;

use crate::backends::ExportFormat;
use crate::color::{Color, ColorFormat};
use crate::config::{PaletteConfig, Settings};

/// Largest palette the interactive view allows.
pub const MAX_COLORS: usize = 20;

/// Pixel coordinate given as `X,Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickPoint {
    pub x: u32,
    pub y: u32,
}

impl FromStr for PickPoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (x, y) = s
            .split_once(',')
            .with_context(|| format!("expected X,Y but got {s:?}"))?;
        let coord = |v: &str| {
            v.trim()
                .parse::<u32>()
                .with_context(|| format!("invalid coordinate {v:?} in {s:?}"))
        };
        Ok(Self {
            x: coord(x)?,
            y: coord(y)?,
        })
    }
}

impl fmt::Display for PickPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Extract a named color palette from a screenshot.
#[derive(Parser, Debug)]
#[command(name = "vibepalette", version, about)]
pub struct Args {
    /// Path to the screenshot (not needed with --history)
    #[arg(required_unless_present = "history")]
    pub image: Option<PathBuf>,

    /// Number of colors to pick (defaults to the saved setting)
    #[arg(
        short = 'n',
        long = "colors",
        value_parser = clap::value_parser!(u16).range(1..=MAX_COLORS as i64)
    )]
    pub colors: Option<u16>,

    /// Notation used when printing colors
    #[arg(short, long, value_enum)]
    pub format: Option<ColorFormat>,

    /// Write the palette to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Export file format (inferred from --export's extension if omitted)
    #[arg(long, value_enum)]
    pub export_format: Option<ExportFormat>,

    /// JSON file with palette tuning overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print truecolor swatches with contrast against white and black
    #[arg(long)]
    pub preview: bool,

    /// Also report contrast against this background in the preview
    #[arg(long, value_name = "HEX", requires = "preview")]
    pub contrast_against: Option<Color>,

    /// Launch interactive TUI mode
    #[arg(long, conflicts_with_all = ["preview", "export"])]
    pub tui: bool,

    /// Name the color of the pixel at X,Y instead of extracting a palette
    /// (repeatable)
    #[arg(
        long,
        value_name = "X,Y",
        conflicts_with_all = ["tui", "preview", "export", "share"]
    )]
    pub pick: Vec<PickPoint>,

    /// Print a coolors.co link for the palette
    #[arg(long)]
    pub share: bool,

    /// Order colors by hue instead of selection order
    #[arg(long)]
    pub sort_by_hue: bool,

    /// Show recently extracted palettes and exit
    #[arg(long)]
    pub history: bool,

    /// Do not record this palette in the history
    #[arg(long)]
    pub no_history: bool,

    /// Persist the effective format and count as the new defaults
    #[arg(long)]
    pub save_settings: bool,
}

impl Args {
    /// Fold command-line overrides into the loaded settings.
    pub fn apply(&self, settings: &mut Settings, tuning: Option<PaletteConfig>) {
        if let Some(palette) = tuning {
            settings.palette = palette;
        }
        if let Some(n) = self.colors {
            settings.palette.target_color_count = n as usize;
        }
        if let Some(format) = self.format {
            settings.color_format = format;
        }
        if let Some(format) = self.resolved_export_format() {
            settings.export_format = format;
        }
    }

    /// Explicit `--export-format`, else the `--export` path's extension.
    pub fn resolved_export_format(&self) -> Option<ExportFormat> {
        self.export_format.or_else(|| {
            let ext = self.export.as_ref()?.extension()?.to_str()?.to_ascii_lowercase();
            match ext.as_str() {
                "png" => Some(ExportFormat::Png),
                "css" => Some(ExportFormat::Css),
                "json" => Some(ExportFormat::Json),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("vibepalette").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn image_is_required_unless_listing_history() {
        assert!(Args::try_parse_from(["vibepalette"]).is_err());
        assert!(parse(&["--history"]).image.is_none());
    }

    #[test]
    fn color_count_is_bounded() {
        assert!(Args::try_parse_from(["vibepalette", "a.png", "-n", "0"]).is_err());
        assert!(Args::try_parse_from(["vibepalette", "a.png", "-n", "21"]).is_err());
        assert_eq!(parse(&["a.png", "-n", "20"]).colors, Some(20));
    }

    #[test]
    fn export_format_follows_extension() {
        let args = parse(&["a.png", "--export", "out/palette.CSS"]);
        assert_eq!(args.resolved_export_format(), Some(ExportFormat::Css));

        let args = parse(&["a.png", "--export", "p.css", "--export-format", "json"]);
        assert_eq!(args.resolved_export_format(), Some(ExportFormat::Json));

        let args = parse(&["a.png", "--export", "palette.txt"]);
        assert_eq!(args.resolved_export_format(), None);
    }

    #[test]
    fn overrides_apply_to_settings() {
        let args = parse(&["a.png", "-n", "4", "--format", "hsl"]);
        let mut settings = Settings::default();
        let tuning = PaletteConfig {
            min_color_distance: 50.0,
            ..PaletteConfig::default()
        };
        args.apply(&mut settings, Some(tuning));

        assert_eq!(settings.palette.target_color_count, 4);
        assert_eq!(settings.palette.min_color_distance, 50.0);
        assert_eq!(settings.color_format, ColorFormat::Hsl);
        assert_eq!(settings.export_format, ExportFormat::Png);
    }

    #[test]
    fn contrast_background_parses_hex() {
        let args = parse(&["a.png", "--preview", "--contrast-against", "#1e1e2e"]);
        assert_eq!(args.contrast_against, Some(Color::new(30, 30, 46)));
        assert!(Args::try_parse_from([
            "vibepalette",
            "a.png",
            "--preview",
            "--contrast-against",
            "nope"
        ])
        .is_err());
        assert!(
            Args::try_parse_from(["vibepalette", "a.png", "--contrast-against", "#fff"]).is_err()
        );
    }

    #[test]
    fn tui_conflicts_with_export() {
        assert!(
            Args::try_parse_from(["vibepalette", "a.png", "--tui", "--export", "x.css"]).is_err()
        );
    }

    #[test]
    fn pick_points_repeat() {
        let args = parse(&["a.png", "--pick", "10,20", "--pick", " 0 , 3 "]);
        assert_eq!(
            args.pick,
            vec![PickPoint { x: 10, y: 20 }, PickPoint { x: 0, y: 3 }]
        );
        assert_eq!(args.pick[0].to_string(), "10,20");
        assert!(Args::try_parse_from(["vibepalette", "a.png", "--pick", "10"]).is_err());
        assert!(Args::try_parse_from(["vibepalette", "a.png", "--pick", "-1,4"]).is_err());
        assert!(
            Args::try_parse_from(["vibepalette", "a.png", "--pick", "1,1", "--tui"]).is_err()
        );
    }
}
