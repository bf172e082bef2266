use thiserror::Error;

/// Input-contract violations raised by the extraction core.
///
/// Heuristic decisions never fail; only a bitmap the sampler cannot
/// partition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("bitmap has zero area: {width}x{height}")]
    EmptyBitmap { width: u32, height: u32 },

    #[error("{width}x{height} bitmap cannot be split into a {cols}x{rows} sampling grid")]
    GridTooFine {
        width: u32,
        height: u32,
        cols: u32,
        rows: u32,
    },

    #[error("pixel {x},{y} is outside the {width}x{height} bitmap")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
