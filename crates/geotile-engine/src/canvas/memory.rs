use crate::coords::Viewport;
use crate::paint::Rgba8;

use super::{Canvas, CanvasError};

/// Fixed-size in-memory RGBA canvas, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCanvas {
    size: Viewport,
    pixels: Vec<Rgba8>,
}

impl MemoryCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let size = Viewport::new(width, height);
        Self {
            size,
            pixels: vec![Rgba8::TRANSPARENT; size.area()],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, suitable for image encoders.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }
}

impl Canvas for MemoryCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn write_region(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[Rgba8],
    ) -> Result<(), CanvasError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CanvasError::SizeMismatch { expected, actual: pixels.len() });
        }

        let fits_x = u64::from(x) + u64::from(width) <= u64::from(self.size.width);
        let fits_y = u64::from(y) + u64::from(height) <= u64::from(self.size.height);
        if !fits_x || !fits_y {
            return Err(CanvasError::OutOfBounds { x, y, width, height, canvas: self.size });
        }

        if width == 0 {
            return Ok(());
        }
        for (row, src) in pixels.chunks_exact(width as usize).enumerate() {
            let start = self.index(x, y + row as u32);
            self.pixels[start..start + src.len()].copy_from_slice(src);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }
}
