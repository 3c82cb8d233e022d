//! Geotile engine crate.
//!
//! Tiled rendering of georeferenced element lists: a moving window sweeps a
//! World's extent tile by tile, and a render pipeline drives a primary renderer
//! (optionally gated by a no-data mask renderer) over each tile into a
//! caller-owned canvas.
//!
//! Everything here is single-threaded; shared state lives behind `Rc`.

pub mod logging;

pub mod coords;
pub mod paint;
pub mod world;
pub mod canvas;
pub mod element;
pub mod render;
pub mod progress;
pub mod tiling;
pub mod pipeline;

pub use pipeline::{PipelineState, RenderPipeline};
pub use tiling::{MovingWindow, TilingConfig};
pub use world::World;
