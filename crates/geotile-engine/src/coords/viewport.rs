/// Viewport size in pixels.
///
/// Paired with the world window: the window is mapped onto `[0, width] x [0, height]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}
