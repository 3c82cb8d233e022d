//! Pixel sinks.
//!
//! The pipeline never touches pixels itself: the caller hands it an output canvas
//! and the tile renderer writes each finished tile into it. Mask canvases are
//! tile-local and owned by the pipeline.

mod error;
mod mask;
mod memory;

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Viewport;
use crate::paint::Rgba8;

pub use error::CanvasError;
pub use mask::MaskCanvas;
pub use memory::MemoryCanvas;

/// Output pixel sink.
pub trait Canvas {
    fn size(&self) -> Viewport;

    /// Writes a `width x height` block of row-major pixels with its top-left corner at `(x, y)`.
    fn write_region(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[Rgba8],
    ) -> Result<(), CanvasError>;

    fn clear(&mut self);
}

/// Caller-owned output canvas shared with the pipeline.
pub type SharedCanvas = Rc<RefCell<dyn Canvas>>;
