//! Paint model used by the tile renderer.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - 8-bit canvas pixels
//! - value-to-color ramps for raster symbology

pub mod color;
pub mod ramp;

pub use color::{Color, Rgba8};
pub use ramp::{ColorRamp, ColorStop, SpreadMode};
