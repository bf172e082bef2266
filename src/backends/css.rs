use anyhow::Result;

use crate::color::Color;
use crate::pipeline::name::generate_css_var_names;

use super::PaletteExporter;

/// CSS custom properties in a `:root` block, named after each color.
pub struct CssExporter;

impl CssExporter {
    pub fn stylesheet(palette: &[Color]) -> String {
        let mut out = String::from(":root {\n");
        for (var, color) in generate_css_var_names(palette).iter().zip(palette) {
            out.push_str(&format!("  --{var}: {};\n", color.to_hex()));
        }
        out.push_str("}\n");
        out
    }
}

impl PaletteExporter for CssExporter {
    fn name(&self) -> &str {
        "CSS"
    }

    fn extension(&self) -> &str {
        "css"
    }

    fn render(&self, palette: &[Color]) -> Result<Vec<u8>> {
        Ok(Self::stylesheet(palette).into_bytes())
    }
}
