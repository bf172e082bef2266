use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::style::{self, Stylize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vibepalette::backends::coolors_url;
use vibepalette::cli::{Args, PickPoint};
use vibepalette::color::{Color, ColorFormat};
use vibepalette::config::{settings_path, PaletteConfig, Settings};
use vibepalette::history::{history_path, PaletteHistory};
use vibepalette::pipeline::extract::{load_screenshot, Extraction};
use vibepalette::pipeline::name::name_color;
use vibepalette::pipeline::sample::pick;
use vibepalette::pipeline::select::sort_by_hue;
use vibepalette::tui::{self, widgets::contrast_summary, TuiApp};

const WHITE: Color = Color::new(255, 255, 255);
const BLACK: Color = Color::new(0, 0, 0);

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibepalette=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let settings_file = settings_path();
    let mut settings = Settings::load(&settings_file);

    if args.history {
        print_history(&PaletteHistory::load(&history_path()), settings.color_format);
        return Ok(());
    }

    let image_path = args
        .image
        .as_deref()
        .context("no screenshot given")?;
    let tuning = args
        .config
        .as_deref()
        .map(PaletteConfig::from_file)
        .transpose()?;
    args.apply(&mut settings, tuning);

    let screenshot = load_screenshot(image_path)?;
    if !args.pick.is_empty() {
        return print_picks(&screenshot, &args.pick, settings.color_format);
    }

    let mut extraction = Extraction::run(
        &screenshot,
        settings.palette.target_color_count,
        &settings.palette,
    )
    .with_context(|| format!("cannot extract a palette from {}", image_path.display()))?;
    if args.sort_by_hue {
        sort_by_hue(
            &mut extraction.palette,
            settings.palette.min_saturation_colorful,
        );
    }

    if !args.no_history {
        record_history(&extraction.palette);
    }

    if args.tui {
        let mut app = TuiApp::new(extraction, screenshot, settings);
        app.sort_by_hue = args.sort_by_hue;
        let app = tui::run(app)?;
        if args.save_settings {
            app.settings.save(&settings_file)?;
        }
        return Ok(());
    }

    for (i, &color) in extraction.palette.iter().enumerate() {
        if args.preview {
            print_swatch(i, color, settings.color_format, args.contrast_against);
        } else {
            println!("{:<20} {}", name_color(color), color.format(settings.color_format));
        }
    }

    if let Some(path) = &args.export {
        let exporter = settings.export_format.exporter(&screenshot);
        exporter.write_to(&extraction.palette, path)?;
        eprintln!("{} palette written to {}", exporter.name(), path.display());
    }

    if args.share {
        println!("{}", coolors_url(&extraction.palette));
    }

    if args.save_settings {
        settings.save(&settings_file)?;
        eprintln!("settings saved to {}", settings_file.display());
    }

    Ok(())
}

fn record_history(palette: &[Color]) {
    let path = history_path();
    let mut history = PaletteHistory::load(&path);
    history.push(palette, Utc::now());
    if let Err(e) = history.save(&path) {
        tracing::warn!(error = %e, "could not save palette history");
    }
}

fn print_picks(
    screenshot: &image::RgbaImage,
    points: &[PickPoint],
    format: ColorFormat,
) -> Result<()> {
    for point in points {
        let color = pick(screenshot, point.x, point.y)
            .with_context(|| format!("cannot pick a color at {point}"))?;
        println!(
            "{:<10} {:<20} {}",
            point.to_string(),
            name_color(color),
            color.format(format)
        );
    }
    Ok(())
}

fn block(color: Color, width: usize) -> style::StyledContent<String> {
    " ".repeat(width).on(style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    })
}

fn print_swatch(index: usize, color: Color, format: ColorFormat, against: Option<Color>) {
    let mut line = format!(
        "{:>2} {} {:<20} {:<22} white {:<12} black {:<12}",
        index + 1,
        block(color, 6),
        name_color(color),
        color.format(format),
        contrast_summary(&color, &WHITE),
        contrast_summary(&color, &BLACK),
    );
    if let Some(background) = against {
        line.push_str(&format!(" {background} {}", contrast_summary(&color, &background)));
    }
    println!("{}", line.trim_end());
}

fn print_history(history: &PaletteHistory, format: ColorFormat) {
    if history.entries().is_empty() {
        println!("no palettes recorded yet");
        return;
    }
    for entry in history.entries() {
        let swatches: String = entry
            .colors
            .iter()
            .map(|&c| block(c, 3).to_string())
            .collect();
        let values: Vec<String> = entry.colors.iter().map(|c| c.format(format)).collect();
        println!(
            "{}  {swatches}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            values.join(" ")
        );
    }
}
