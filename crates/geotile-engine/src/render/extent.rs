use crate::element::ElementList;
use crate::world::World;

/// Something allowed to resize the World to suit a list.
///
/// Renderers apply an enabled manager once when they attach to a World. The
/// render pipeline disables it on every renderer it builds so the tiling sweep
/// stays the only writer of the shared window.
pub trait WorldExtentManager {
    fn update_extent(&mut self, world: &World, list: &ElementList);
}

/// Sets the World extent (and window) to the extent of the list's active elements.
#[derive(Debug, Default, Copy, Clone)]
pub struct FitToElements;

impl WorldExtentManager for FitToElements {
    fn update_extent(&mut self, world: &World, list: &ElementList) {
        let Some(extent) = list.extent() else {
            log::debug!("FitToElements: list has no extent; world left unchanged");
            return;
        };
        if world.extent() == extent && world.window() == extent {
            return;
        }
        let _batch = world.batch();
        world.set_extent(extent);
        world.set_window(extent);
    }
}
