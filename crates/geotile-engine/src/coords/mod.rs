//! Coordinate and geometry types shared by the world, tiling and renderers.
//!
//! Two spaces are in play:
//! - window space: world coordinates (georeferenced units), any axis orientation
//! - viewport space: pixels, origin top-left, +X right, +Y down
//!
//! `Subset` is deliberately orientation-free. A raster in a north-up projection
//! typically has `ul.y > lr.y`; the tiling code reads the direction of each axis
//! through `Dimension` instead of assuming one.

mod coordinates;
mod dimension;
mod subset;
mod viewport;

pub use coordinates::Coordinates;
pub use dimension::Dimension;
pub use subset::Subset;
pub use viewport::Viewport;
