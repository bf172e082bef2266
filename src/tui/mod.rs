pub mod widgets;

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use image::RgbaImage;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::DefaultTerminal;

use crate::cli::MAX_COLORS;
use crate::config::Settings;
use crate::pipeline::extract::Extraction;
use crate::pipeline::select::sort_by_hue;

use widgets::PaletteWidget;

const HELP: &str = "←/→ select  +/- colors  f format  e export  q quit";

/// State for the interactive TUI application.
pub struct TuiApp {
    pub extraction: Extraction,
    pub screenshot: RgbaImage,
    pub settings: Settings,
    pub selected: usize,
    /// Where `e` writes exports.
    pub export_dir: PathBuf,
    pub status: Option<String>,
    /// Keep re-selected palettes in hue order.
    pub sort_by_hue: bool,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(extraction: Extraction, screenshot: RgbaImage, settings: Settings) -> Self {
        Self {
            extraction,
            screenshot,
            settings,
            selected: 0,
            export_dir: PathBuf::from("."),
            status: None,
            sort_by_hue: false,
            should_quit: false,
        }
    }

    pub fn count(&self) -> usize {
        self.settings.palette.target_color_count
    }

    fn set_count(&mut self, count: usize) {
        let count = count.clamp(1, MAX_COLORS);
        if count == self.count() {
            return;
        }
        self.settings.palette.target_color_count = count;
        let len = self
            .extraction
            .reselect(count, &self.settings.palette)
            .len();
        if self.sort_by_hue {
            sort_by_hue(
                &mut self.extraction.palette,
                self.settings.palette.min_saturation_colorful,
            );
        }
        self.selected = self.selected.min(len.saturating_sub(1));
        self.status = Some(format!("{len} colors"));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let len = self.extraction.palette.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_count(self.count() + 1),
            KeyCode::Char('-') => self.set_count(self.count().saturating_sub(1)),
            KeyCode::Char('f') => {
                self.settings.color_format = self.settings.color_format.next();
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn export(&mut self) {
        let exporter = self.settings.export_format.exporter(&self.screenshot);
        self.status = Some(
            match exporter.export_into(&self.extraction.palette, &self.export_dir) {
                Ok(path) => format!("{} exported to {}", exporter.name(), path.display()),
                Err(e) => format!("export failed: {e:#}"),
            },
        );
    }

    fn draw(&self, frame: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        frame.render_widget(
            PaletteWidget::new(
                &self.extraction.palette,
                self.selected,
                self.settings.color_format,
            )
            .show_labels(self.settings.show_labels),
            main,
        );

        let footer_text = match &self.status {
            Some(status) => format!(" {status}  |  {HELP}"),
            None => format!(" {HELP}"),
        };
        frame.render_widget(
            Paragraph::new(footer_text).style(Style::default().fg(Color::DarkGray)),
            footer,
        );
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }
}

/// Launch the TUI application. Returns the final state so the caller can
/// persist the count and format the user settled on.
pub fn run(mut app: TuiApp) -> Result<TuiApp> {
    let mut terminal = ratatui::init();
    let result = app.event_loop(&mut terminal);
    ratatui::restore();
    result.map(|()| app)
}
