use super::Color;

/// Ramp behavior outside the [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the ramp.
    Repeat,
    /// Mirror-repeat the ramp.
    Reflect,
}

/// A single ramp stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Maps a normalized raster value to a color.
///
/// Stops are sorted by `t` on construction. A ramp with no stops samples as
/// transparent; a single stop samples as that stop everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
    spread: SpreadMode,
}

impl ColorRamp {
    pub fn new(mut stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        stops.retain(|s| s.t.is_finite() && s.color.is_finite());
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { stops, spread }
    }

    /// Black to white, padded.
    pub fn grayscale() -> Self {
        Self::new(
            vec![
                ColorStop::new(0.0, Color::from_straight(0.0, 0.0, 0.0, 1.0)),
                ColorStop::new(1.0, Color::from_straight(1.0, 1.0, 1.0, 1.0)),
            ],
            SpreadMode::Pad,
        )
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn sample(&self, t: f32) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Color::transparent(),
        };
        if !t.is_finite() {
            return Color::transparent();
        }

        let t = match self.spread {
            SpreadMode::Pad => t,
            SpreadMode::Repeat => t.rem_euclid(1.0),
            SpreadMode::Reflect => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        };

        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.t) / span);
            }
        }
        last.color
    }
}
