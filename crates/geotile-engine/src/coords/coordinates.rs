use core::ops::{Add, Mul, Sub};

/// 2D point in either window space or viewport space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Coordinates {
    type Output = Coordinates;
    #[inline]
    fn add(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;
    #[inline]
    fn sub(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Coordinates {
    type Output = Coordinates;
    #[inline]
    fn mul(self, rhs: f64) -> Coordinates {
        Coordinates::new(self.x * rhs, self.y * rhs)
    }
}
