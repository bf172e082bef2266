use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::{Color as AppColor, ColorFormat, WcagLevel};
use crate::pipeline::name::name_color;

const SWATCH_WIDTH: usize = 10;
const SWATCHES_PER_ROW: usize = 5;

const WHITE: AppColor = AppColor::new(255, 255, 255);
const BLACK: AppColor = AppColor::new(0, 0, 0);

/// Swatch grid for the palette, with a detail line for the selected color.
pub struct PaletteWidget<'a> {
    palette: &'a [AppColor],
    selected: usize,
    format: ColorFormat,
    show_labels: bool,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a [AppColor], selected: usize, format: ColorFormat) -> Self {
        Self {
            palette,
            selected,
            format,
            show_labels: true,
        }
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }
}

pub(crate) fn to_color(c: &AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Black or white text, whichever reads better on `c`.
pub(crate) fn contrast_fg(c: &AppColor) -> Color {
    if AppColor::contrast_ratio(c, &BLACK) >= AppColor::contrast_ratio(c, &WHITE) {
        Color::Black
    } else {
        Color::White
    }
}

/// `"4.5:1 AA"` style summary of `c` against a background.
pub fn contrast_summary(c: &AppColor, against: &AppColor) -> String {
    let ratio = AppColor::contrast_ratio(c, against);
    format!("{ratio:.1}:1 {}", WcagLevel::from_ratio(ratio).label())
}

fn swatch_row(chunk: &[AppColor], start: usize, selected: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (offset, c) in chunk.iter().enumerate() {
        let i = start + offset;
        let mut style = Style::default().bg(to_color(c)).fg(contrast_fg(c));
        if i == selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("{:^SWATCH_WIDTH$}", i + 1), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn label_row(chunk: &[AppColor], start: usize, selected: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (offset, c) in chunk.iter().enumerate() {
        let style = if start + offset == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{:^SWATCH_WIDTH$}", c.to_hex()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!("Palette ({})", self.palette.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for (row, chunk) in self.palette.chunks(SWATCHES_PER_ROW).enumerate() {
            let start = row * SWATCHES_PER_ROW;
            lines.push(swatch_row(chunk, start, self.selected));
            if self.show_labels {
                lines.push(label_row(chunk, start, self.selected));
            }
            lines.push(Line::from(""));
        }

        if let Some(color) = self.palette.get(self.selected) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("  {}  ", self.selected + 1),
                    Style::default().bg(to_color(color)).fg(contrast_fg(color)),
                ),
                Span::styled(
                    format!("  {}", name_color(*color)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}", color.format(self.format))),
            ]));
            lines.push(Line::from(format!(
                "  on white {}   on black {}",
                contrast_summary(color, &WHITE),
                contrast_summary(color, &BLACK),
            )));
        } else {
            lines.push(Line::from("  no colors found"));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
