use crate::coords::{Coordinates, Subset, Viewport};

/// Copyable snapshot of a World: what observers receive on every notification.
///
/// `transform` maps window space onto `[0, width] x [0, height]` pixels and
/// `inverse_transform` maps back. Both are only meaningful when
/// [`is_initialized`](Self::is_initialized) holds; a degenerate window yields
/// non-finite results.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WorldView {
    pub extent: Subset,
    pub window: Subset,
    pub viewport: Viewport,
}

impl WorldView {
    pub fn is_initialized(&self) -> bool {
        self.extent.is_finite()
            && !self.extent.is_degenerate()
            && self.window.is_finite()
            && !self.window.is_degenerate()
            && self.viewport.is_valid()
    }

    /// Window point to viewport pixel.
    pub fn transform(&self, p: Coordinates) -> Coordinates {
        let w = &self.window;
        Coordinates::new(
            (p.x - w.ul.x) / (w.lr.x - w.ul.x) * f64::from(self.viewport.width),
            (p.y - w.ul.y) / (w.lr.y - w.ul.y) * f64::from(self.viewport.height),
        )
    }

    /// Viewport pixel to window point.
    pub fn inverse_transform(&self, p: Coordinates) -> Coordinates {
        let w = &self.window;
        Coordinates::new(
            w.ul.x + p.x / f64::from(self.viewport.width) * (w.lr.x - w.ul.x),
            w.ul.y + p.y / f64::from(self.viewport.height) * (w.lr.y - w.ul.y),
        )
    }

    /// Pixel position of the window's upper-left corner relative to the extent's
    /// upper-left corner, at the current window/viewport scale.
    pub fn tile_offset(&self) -> (i64, i64) {
        let origin = self.transform(self.extent.ul);
        ((-origin.x).round() as i64, (-origin.y).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(window: Subset, w: u32, h: u32) -> WorldView {
        WorldView {
            extent: Subset::new(0.0, 100.0, 100.0, 0.0),
            window,
            viewport: Viewport::new(w, h),
        }
    }

    #[test]
    fn transform_maps_corners_to_pixel_bounds() {
        let v = view(Subset::new(0.0, 100.0, 100.0, 0.0), 200, 50);
        assert_eq!(v.transform(Coordinates::new(0.0, 100.0)), Coordinates::new(0.0, 0.0));
        assert_eq!(v.transform(Coordinates::new(100.0, 0.0)), Coordinates::new(200.0, 50.0));
        assert_eq!(v.transform(Coordinates::new(50.0, 50.0)), Coordinates::new(100.0, 25.0));
    }

    #[test]
    fn inverse_transform_undoes_transform() {
        let v = view(Subset::new(20.0, 80.0, 60.0, 40.0), 40, 40);
        let p = Coordinates::new(35.0, 55.0);
        assert_eq!(v.inverse_transform(v.transform(p)), p);
    }

    #[test]
    fn tile_offset_counts_pixels_from_extent_origin() {
        // 1 world unit per pixel, window starts 40 units right and 40 units down.
        let v = view(Subset::new(40.0, 60.0, 80.0, 20.0), 40, 40);
        assert_eq!(v.tile_offset(), (40, 40));
    }

    #[test]
    fn initialized_requires_valid_viewport_and_window() {
        assert!(view(Subset::new(0.0, 1.0, 1.0, 0.0), 1, 1).is_initialized());
        assert!(!view(Subset::new(0.0, 1.0, 1.0, 0.0), 0, 1).is_initialized());
        assert!(!view(Subset::new(0.0, 1.0, 0.0, 0.0), 1, 1).is_initialized());
        assert!(!WorldView::default().is_initialized());
    }
}
