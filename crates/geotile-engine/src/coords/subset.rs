use super::{Coordinates, Dimension};

/// Axis-aligned rectangle given by its upper-left and lower-right corners.
///
/// There is no fixed orientation: either axis may decrease from `ul` to `lr`.
/// `Subset::EMPTY` (both corners at the origin) marks a rectangle that has not been
/// computed yet; the tiling sweep uses it to recognize its first step.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Subset {
    pub ul: Coordinates,
    pub lr: Coordinates,
}

impl Subset {
    pub const EMPTY: Subset = Subset {
        ul: Coordinates::zero(),
        lr: Coordinates::zero(),
    };

    #[inline]
    pub const fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self {
            ul: Coordinates::new(ulx, uly),
            lr: Coordinates::new(lrx, lry),
        }
    }

    #[inline]
    pub const fn from_corners(ul: Coordinates, lr: Coordinates) -> Self {
        Self { ul, lr }
    }

    #[inline]
    pub fn is_empty_sentinel(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Absolute span along x.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.lr.x - self.ul.x).abs()
    }

    /// Absolute span along y.
    #[inline]
    pub fn height(&self) -> f64 {
        (self.lr.y - self.ul.y).abs()
    }

    /// True when either axis has no span.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.ul.is_finite() && self.lr.is_finite()
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self)
    }

    /// Half-open containment measured from `ul` toward `lr`: the `ul` edges are
    /// inside, the `lr` edges are not. Works for every axis orientation.
    pub fn contains(&self, p: Coordinates) -> bool {
        let dx = self.lr.x - self.ul.x;
        let dy = self.lr.y - self.ul.y;
        if dx == 0.0 || dy == 0.0 {
            return false;
        }
        let tx = (p.x - self.ul.x) / dx;
        let ty = (p.y - self.ul.y) / dy;
        (0.0..1.0).contains(&tx) && (0.0..1.0).contains(&ty)
    }

    /// Smallest subset covering both, expressed in the orientation of `self`.
    pub fn union(&self, other: &Subset) -> Subset {
        let dim = self.dimension();
        let (min_x, max_x) = span(self.ul.x, self.lr.x, other.ul.x, other.lr.x);
        let (min_y, max_y) = span(self.ul.y, self.lr.y, other.ul.y, other.lr.y);

        let (ulx, lrx) = if dim.x_sign() > 0.0 { (min_x, max_x) } else { (max_x, min_x) };
        let (uly, lry) = if dim.y_sign() > 0.0 { (min_y, max_y) } else { (max_y, min_y) };
        Subset::new(ulx, uly, lrx, lry)
    }
}

fn span(a0: f64, a1: f64, b0: f64, b1: f64) -> (f64, f64) {
    (a0.min(a1).min(b0).min(b1), a0.max(a1).max(b0).max(b1))
}
