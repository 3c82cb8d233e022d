//! Renderable elements and the ordered list handed to renderers.
//!
//! Element kinds form a closed set; renderers match on `Element` once per tile
//! instead of probing types at runtime.

mod list;
mod no_data;
mod raster;
mod vector;

pub use list::ElementList;
pub use no_data::NoDataConfig;
pub use raster::{RasterElement, RasterSample};
pub use vector::VectorElement;

use crate::coords::Subset;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Raster(RasterElement),
    Vector(VectorElement),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Raster(r) => r.name(),
            Element::Vector(v) => v.name(),
        }
    }

    /// Georeferenced bounds; `None` for an element with nothing to draw.
    pub fn extent(&self) -> Option<Subset> {
        match self {
            Element::Raster(r) => Some(r.extent()),
            Element::Vector(v) => v.extent(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Element::Raster(r) => r.is_active(),
            Element::Vector(v) => v.is_active(),
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match self {
            Element::Raster(r) => r.set_active(active),
            Element::Vector(v) => v.set_active(active),
        }
    }
}

impl From<RasterElement> for Element {
    fn from(r: RasterElement) -> Self {
        Element::Raster(r)
    }
}

impl From<VectorElement> for Element {
    fn from(v: VectorElement) -> Self {
        Element::Vector(v)
    }
}
