//! Tiled render orchestration.
//!
//! `RenderPipeline` wires an element list, an optional mask list, a World and an
//! output canvas to a primary renderer (and a mask renderer when a mask list is
//! set), then sweeps the World's extent tile by tile. Each window change reaches
//! the renderers through the World's observer list, mask first.

mod controller;

pub use controller::{PipelineState, RenderPipeline};
