use crate::coords::{Coordinates, Subset};
use crate::paint::Color;

/// Point features drawn as round markers of a fixed pixel radius.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorElement {
    name: String,
    points: Vec<Coordinates>,
    radius_px: f64,
    color: Color,
    active: bool,
}

impl VectorElement {
    pub fn new(name: impl Into<String>, points: Vec<Coordinates>, radius_px: f64, color: Color) -> Self {
        Self {
            name: name.into(),
            points,
            radius_px: radius_px.max(0.0),
            color,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Bounding box of the points (positive orientation), `None` when empty.
    pub fn extent(&self) -> Option<Subset> {
        let first = self.points.first()?;
        let mut s = Subset::from_corners(*first, *first);
        for p in &self.points[1..] {
            s = Subset::new(s.ul.x.min(p.x), s.ul.y.min(p.y), s.lr.x.max(p.x), s.lr.y.max(p.y));
        }
        Some(s)
    }

    /// Whether a pixel centred at `p` falls under a marker, given the world size of
    /// one pixel along each axis.
    pub fn covers(&self, p: Coordinates, pixel_size: Coordinates) -> bool {
        let (sx, sy) = (pixel_size.x.abs(), pixel_size.y.abs());
        if sx <= 0.0 || sy <= 0.0 {
            return false;
        }
        let r2 = self.radius_px * self.radius_px;
        self.points.iter().any(|q| {
            let dx = (p.x - q.x) / sx;
            let dy = (p.y - q.y) / sy;
            dx * dx + dy * dy <= r2
        })
    }
}
