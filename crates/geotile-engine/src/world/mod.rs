//! The World: extent, current window and viewport, plus change notification.
//!
//! Responsibilities:
//! - hold the three related rectangles the tiling sweep works on
//! - map points between window space and viewport space
//! - notify observers (renderers) when the view changes, with scoped batching so
//!   compound updates are observed as one consistent change

mod batch;
mod view;
#[allow(clippy::module_inception)]
mod world;

pub use batch::UpdateBatch;
pub use view::WorldView;
pub use world::{ObserverId, SharedObserver, World, WorldObserver};
