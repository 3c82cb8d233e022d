use super::World;

/// Scoped suppression of World notifications.
///
/// While any batch is alive, changes are queued instead of announced. Dropping the
/// last batch emits one coalesced notification if something changed. Batches nest.
#[must_use = "notifications resume as soon as the batch is dropped"]
pub struct UpdateBatch<'a> {
    world: &'a World,
}

impl<'a> UpdateBatch<'a> {
    pub(super) fn new(world: &'a World) -> Self {
        world.enter_batch();
        Self { world }
    }
}

impl Drop for UpdateBatch<'_> {
    fn drop(&mut self) {
        self.world.leave_batch();
    }
}
