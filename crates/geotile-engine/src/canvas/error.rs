use std::fmt;

use crate::coords::Viewport;

/// Rejected canvas write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The region does not fit inside the canvas.
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas: Viewport,
    },
    /// The pixel slice does not hold `width * height` pixels.
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::OutOfBounds { x, y, width, height, canvas } => write!(
                f,
                "region {width}x{height} at ({x}, {y}) exceeds canvas {}x{}",
                canvas.width, canvas.height
            ),
            CanvasError::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels, got {actual}")
            }
        }
    }
}

impl std::error::Error for CanvasError {}
