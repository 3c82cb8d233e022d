use super::Subset;

/// Read-only measurements of a `Subset`.
///
/// Widths are absolute spans; the direction each axis runs from `ul` to `lr` is
/// kept separately as a sign so sweeps can be written once for every orientation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dimension {
    width: f64,
    height: f64,
    x_sign: f64,
    y_sign: f64,
}

impl Dimension {
    pub fn new(subset: &Subset) -> Self {
        let dx = subset.lr.x - subset.ul.x;
        let dy = subset.lr.y - subset.ul.y;
        Self {
            width: dx.abs(),
            height: dy.abs(),
            x_sign: if dx < 0.0 { -1.0 } else { 1.0 },
            y_sign: if dy < 0.0 { -1.0 } else { 1.0 },
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// `+1.0` when x grows from `ul` to `lr`, `-1.0` otherwise.
    #[inline]
    pub fn x_sign(&self) -> f64 {
        self.x_sign
    }

    /// `+1.0` when y grows from `ul` to `lr`, `-1.0` otherwise.
    #[inline]
    pub fn y_sign(&self) -> f64 {
        self.y_sign
    }
}

impl From<Subset> for Dimension {
    fn from(subset: Subset) -> Self {
        Self::new(&subset)
    }
}
