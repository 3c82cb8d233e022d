use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Renders a synthetic terrain scene tile by tile into a PNG.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version)]
pub struct StudioConfig {
    /// Raises log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Width of the output image in pixels.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,
    /// Height of the output image in pixels.
    #[arg(long, default_value_t = 384, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
    /// Where the PNG is written.
    #[arg(default_value = "geotile.png")]
    pub output: PathBuf,
    /// Largest tile edge in pixels.
    #[arg(default_value_t = 128, value_parser = clap::value_parser!(u32).range(1..))]
    pub tile_size: u32,
}
