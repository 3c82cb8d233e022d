use crate::coords::Viewport;
use crate::element::NoDataConfig;

/// Tile-local validity mask produced by the mask renderer.
///
/// One flag per viewport pixel; the primary renderer leaves invalid pixels
/// untouched. Carries the no-data settings of the list it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskCanvas {
    size: Viewport,
    valid: Vec<bool>,
    no_data: NoDataConfig,
}

impl MaskCanvas {
    pub fn new(no_data: NoDataConfig) -> Self {
        Self {
            size: Viewport::default(),
            valid: Vec::new(),
            no_data,
        }
    }

    #[inline]
    pub fn no_data(&self) -> NoDataConfig {
        self.no_data
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Resizes to `size` and marks every pixel valid.
    pub fn resize(&mut self, size: Viewport) {
        self.size = size;
        self.valid.clear();
        self.valid.resize(size.area(), true);
    }

    pub fn set(&mut self, x: u32, y: u32, valid: bool) {
        if x < self.size.width && y < self.size.height {
            let i = y as usize * self.size.width as usize + x as usize;
            self.valid[i] = valid;
        }
    }

    /// Pixels outside the mask are invalid.
    pub fn is_valid(&self, x: u32, y: u32) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        self.valid[y as usize * self.size.width as usize + x as usize]
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }
}
