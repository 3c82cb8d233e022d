//! Per-tile rendering.
//!
//! A `TileRenderer` observes the World and renders the current window every time
//! it is notified. Two kinds exist:
//! - `Primary` composites the element list into the caller's output canvas
//! - `Mask` fills a tile-local validity mask that gates the primary renderer
//!
//! Convention:
//! - pixels are sampled at their centres (`px + 0.5`)
//! - a tile lands in the output canvas at `WorldView::tile_offset()`

mod extent;
mod renderer;

pub use extent::{FitToElements, WorldExtentManager};
pub use renderer::{RenderTarget, RendererKind, TileRenderer};
