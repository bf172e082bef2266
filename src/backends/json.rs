use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::color::{Color, Hsl};
use crate::pipeline::name::name_color;

use super::PaletteExporter;

/// Pretty-printed JSON document describing every palette entry.
pub struct JsonExporter {
    exported_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ExportedColor {
    index: usize,
    name: String,
    hex: String,
    rgb: Color,
    hsl: Hsl,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument {
    colors: Vec<ExportedColor>,
    exported_at: DateTime<Utc>,
}

impl JsonExporter {
    pub fn new(exported_at: DateTime<Utc>) -> Self {
        Self { exported_at }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

impl PaletteExporter for JsonExporter {
    fn name(&self) -> &str {
        "JSON"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, palette: &[Color]) -> Result<Vec<u8>> {
        let document = ExportDocument {
            colors: palette
                .iter()
                .enumerate()
                .map(|(i, &color)| ExportedColor {
                    index: i + 1,
                    name: name_color(color),
                    hex: color.to_hex(),
                    rgb: color,
                    hsl: color.to_hsl(),
                })
                .collect(),
            exported_at: self.exported_at,
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}
