// Command-line configuration for the canvas and the host window.

use crate::brush::BrushKind;
use crate::history::DEFAULT_CAPACITY;
use crate::types::Color;
use clap::Parser;
use std::path::PathBuf;

/// Freehand drawing canvas driven by pointer events.
#[derive(Debug, Clone, Parser)]
#[command(name = "air-canvas", version, about)]
pub struct Config {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,

    /// Background colour (#rrggbb), used by clear
    #[arg(long, default_value = "#ffffff")]
    pub background: Color,

    /// Initial brush colour (#rrggbb)
    #[arg(long, default_value = "#000000")]
    pub color: Color,

    /// Initial brush
    #[arg(long, value_enum, default_value_t = BrushKind::Standard)]
    pub brush: BrushKind,

    /// Brush size in pixels (values below 1 are raised to 1)
    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    pub size: i64,

    /// Brush opacity, clamped to [0,1]
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub opacity: f32,

    /// Snapshots kept on the undo and redo stacks
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub history: usize,

    /// Where `save` writes the flattened canvas
    #[arg(long, default_value = "output/drawing.png")]
    pub output: PathBuf,

    /// Seed for brush texture randomness (pencil grain, watercolor)
    #[arg(long)]
    pub seed: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["air-canvas"])
    }
}
