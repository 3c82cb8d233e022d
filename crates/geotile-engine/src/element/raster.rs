use anyhow::{Result, ensure};

use crate::coords::{Coordinates, Subset};
use crate::paint::{Color, ColorRamp};

use super::NoDataConfig;

/// In-memory multi-band raster georeferenced by its extent.
///
/// Band data is row-major, one `f64` per pixel. Pixel `(0, 0)` sits at the
/// extent's `ul` corner whatever the orientation of the axes.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterElement {
    name: String,
    extent: Subset,
    width: u32,
    height: u32,
    bands: Vec<Vec<f64>>,
    range: (f64, f64),
    ramp: ColorRamp,
    active: bool,
}

impl RasterElement {
    pub fn new(
        name: impl Into<String>,
        extent: Subset,
        width: u32,
        height: u32,
        bands: Vec<Vec<f64>>,
    ) -> Result<Self> {
        ensure!(width > 0 && height > 0, "raster has zero size");
        ensure!(
            extent.is_finite() && !extent.is_degenerate(),
            "raster extent {extent:?} is degenerate"
        );
        ensure!(!bands.is_empty(), "raster has no bands");
        let expected = width as usize * height as usize;
        for (i, band) in bands.iter().enumerate() {
            ensure!(
                band.len() == expected,
                "band {i} holds {} values, expected {expected}",
                band.len()
            );
        }

        let range = value_range(&bands);
        Ok(Self {
            name: name.into(),
            extent,
            width,
            height,
            bands,
            range,
            ramp: ColorRamp::grayscale(),
            active: true,
        })
    }

    /// Overrides the normalisation range (defaults to the finite data range).
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extent(&self) -> Subset {
        self.extent
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn value_range(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Nearest-neighbour lookup of the pixel covering `p`.
    pub fn sample(&self, p: Coordinates) -> Option<RasterSample<'_>> {
        if !self.extent.contains(p) {
            return None;
        }
        let e = &self.extent;
        let tx = (p.x - e.ul.x) / (e.lr.x - e.ul.x);
        let ty = (p.y - e.ul.y) / (e.lr.y - e.ul.y);
        let col = ((tx * f64::from(self.width)) as u32).min(self.width - 1);
        let row = ((ty * f64::from(self.height)) as u32).min(self.height - 1);
        Some(RasterSample {
            raster: self,
            index: row as usize * self.width as usize + col as usize,
        })
    }

    /// Symbolized color at `p`; `None` outside the raster or on no-data.
    ///
    /// One or two bands go through the ramp (first band); three or more bands are
    /// read as RGB.
    pub fn color_at(&self, p: Coordinates, no_data: &NoDataConfig) -> Option<Color> {
        let sample = self.sample(p)?;
        if no_data.is_no_data(sample.values()) {
            return None;
        }

        if self.bands.len() >= 3 {
            let r = self.normalize(sample.band(0)?);
            let g = self.normalize(sample.band(1)?);
            let b = self.normalize(sample.band(2)?);
            Some(Color::from_straight(r, g, b, 1.0))
        } else {
            Some(self.ramp.sample(self.normalize(sample.band(0)?)))
        }
    }

    fn normalize(&self, v: f64) -> f32 {
        let (min, max) = self.range;
        if max > min { ((v - min) / (max - min)) as f32 } else { 0.0 }
    }
}

/// One pixel of a raster, across all bands.
#[derive(Debug, Copy, Clone)]
pub struct RasterSample<'a> {
    raster: &'a RasterElement,
    index: usize,
}

impl RasterSample<'_> {
    pub fn band(&self, band: usize) -> Option<f64> {
        self.raster.bands.get(band).map(|b| b[self.index])
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.raster.bands.iter().map(move |b| b[self.index])
    }
}

fn value_range(bands: &[Vec<f64>]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in bands.iter().flatten().copied().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min > max { (0.0, 0.0) } else { (min, max) }
}
