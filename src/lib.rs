//! vibepalette - palette extraction and color naming for screenshots.
//!
//! The binary is a thin shell over these modules; they are public so the
//! integration tests can drive the pipeline directly.

pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod named;
pub mod pipeline;
pub mod tui;
