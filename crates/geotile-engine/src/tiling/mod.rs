//! Moving-window tiling of a World extent.
//!
//! The sweep runs left to right along the x axis of the extent, then steps one row
//! along y, in whatever direction each axis runs. Tiles on the far edges shrink
//! to the extent; their viewport shrinks with them so the world size of a pixel
//! stays the same for every tile.

mod config;
mod moving_window;

pub use config::TilingConfig;
pub use moving_window::{MovingWindow, PIXEL_TRUNCATION_BIAS, Tiles, WINDOW_EPSILON};
