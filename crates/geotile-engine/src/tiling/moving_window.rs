use crate::coords::{Coordinates, Subset, Viewport};
use crate::world::World;

use super::TilingConfig;

/// Tolerance, in world units, of the edge tests against the extent.
///
/// Smaller values let float noise open a sliver tile past the edge; larger values
/// start merging the last real tile into the previous one.
pub const WINDOW_EPSILON: f64 = 1e-7;

/// Added to a pixel span before truncating it, so a span computed as
/// `n - 0.0000001` through the transforms still yields `n` pixels.
pub const PIXEL_TRUNCATION_BIAS: f64 = 1e-5;

/// Generates the successive windows of a tiling sweep over a World's extent.
///
/// The window and viewport found on the World at the first step are remembered and
/// put back, in one notified change, once the sweep completes. An abandoned sweep
/// leaves the World on its last tile.
#[derive(Debug, Clone)]
pub struct MovingWindow {
    config: TilingConfig,
    initial_window: Subset,
    initial_viewport: Viewport,
}

impl MovingWindow {
    pub fn new(config: TilingConfig) -> Self {
        Self {
            config,
            initial_window: Subset::EMPTY,
            initial_viewport: Viewport::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> TilingConfig {
        self.config
    }

    /// Window and viewport captured by the current sweep's first step.
    pub fn initial_state(&self) -> (Subset, Viewport) {
        (self.initial_window, self.initial_viewport)
    }

    /// Points the World's window at its whole extent so the next sweep starts
    /// from the extent's corner.
    pub fn reset_to_extent(&self, world: &World) {
        world.set_window(world.extent());
    }

    /// Sets the tile size to `pixels x lines`, limited by the World's viewport and
    /// the configured maxima, and moves the window to a tile of that size at the
    /// current window's corner. Returns `false` (and changes nothing) when the World
    /// is not initialized.
    pub fn set_buffer_size(&self, world: &World, pixels: u32, lines: u32) -> bool {
        if !world.is_initialized() {
            log::debug!("set_buffer_size: world not initialized; ignoring {pixels}x{lines}");
            return false;
        }
        let viewport = world.viewport();
        let width = pixels.min(viewport.width).min(self.config.max_buffer_width);
        let height = lines.min(viewport.height).min(self.config.max_buffer_height);
        if width == 0 || height == 0 {
            log::debug!("set_buffer_size: {pixels}x{lines} leaves an empty tile");
            return false;
        }

        let ul = world.inverse_transform(Coordinates::zero());
        let lr = world.inverse_transform(Coordinates::new(f64::from(width), f64::from(height)));

        let _batch = world.batch();
        world.set_viewport(width, height);
        world.set_window(Subset::from_corners(ul, lr));
        true
    }

    /// `set_buffer_size` with the configured maxima.
    pub fn set_best_buffer_size(&self, world: &World) -> bool {
        self.set_buffer_size(world, self.config.max_buffer_width, self.config.max_buffer_height)
    }

    /// Computes the window following `previous` and applies it, with its viewport,
    /// to the World as one batched change.
    ///
    /// Pass `Subset::EMPTY` to start a sweep: the World's current window is
    /// returned unchanged and its size becomes the nominal tile size of the sweep.
    /// Returns `None` when the extent is covered (the World is restored) or when a
    /// step would not move (the World is left as is).
    pub fn next_window(&mut self, world: &World, previous: &Subset) -> Option<Subset> {
        if previous.is_empty_sentinel() {
            if !world.is_initialized() {
                log::debug!("moving window: world not initialized; nothing to sweep");
                return None;
            }
            self.initial_window = world.window();
            self.initial_viewport = world.viewport();
            return Some(self.initial_window);
        }
        if !self.initial_viewport.is_valid() {
            log::debug!("moving window: sweep was not started from Subset::EMPTY");
            return None;
        }

        let extent = world.extent();
        // Tile size and pixel size stay those of the first tile for the whole sweep.
        let tile = self.initial_window.dimension();
        let pixel_width = tile.width() / f64::from(self.initial_viewport.width);
        let pixel_height = tile.height() / f64::from(self.initial_viewport.height);
        let mut viewport = self.initial_viewport;

        let mut ul = Coordinates::new(previous.lr.x, previous.ul.y);
        if reached(tile.x_sign(), ul.x, extent.lr.x) {
            ul = Coordinates::new(extent.ul.x, previous.lr.y);
            if reached(tile.y_sign(), ul.y, extent.lr.y) {
                self.restore(world);
                return None;
            }
        }

        let mut lr = Coordinates::new(
            ul.x + tile.x_sign() * tile.width(),
            ul.y + tile.y_sign() * tile.height(),
        );
        if exceeds(tile.x_sign(), lr.x, extent.lr.x) {
            lr.x = extent.lr.x;
            viewport.width = pixel_span(lr.x - ul.x, pixel_width);
        }
        if exceeds(tile.y_sign(), lr.y, extent.lr.y) {
            lr.y = extent.lr.y;
            viewport.height = pixel_span(lr.y - ul.y, pixel_height);
        }

        let next = Subset::from_corners(ul, lr);
        if next == *previous {
            log::debug!("moving window: no progress past {previous:?}; ending sweep");
            return None;
        }

        let _batch = world.batch();
        world.set_viewport(viewport.width, viewport.height);
        world.set_window(next);
        Some(next)
    }

    /// Iterator over a full sweep, starting from the World's current window.
    pub fn tiles<'a>(&'a mut self, world: &'a World) -> Tiles<'a> {
        Tiles {
            controller: self,
            world,
            current: Subset::EMPTY,
            done: false,
        }
    }

    /// Puts back the first tile's window and viewport as one notified change.
    fn restore(&self, world: &World) {
        let _batch = world.batch();
        world.set_viewport(self.initial_viewport.width, self.initial_viewport.height);
        world.set_window(self.initial_window);
    }
}

impl Default for MovingWindow {
    fn default() -> Self {
        Self::new(TilingConfig::default())
    }
}

/// See [`MovingWindow::tiles`].
pub struct Tiles<'a> {
    controller: &'a mut MovingWindow,
    world: &'a World,
    current: Subset,
    done: bool,
}

impl Iterator for Tiles<'_> {
    type Item = Subset;

    fn next(&mut self) -> Option<Subset> {
        if self.done {
            return None;
        }
        match self.controller.next_window(self.world, &self.current) {
            Some(window) => {
                self.current = window;
                Some(window)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// `value` has reached `limit` along an axis running in direction `sign`.
#[inline]
fn reached(sign: f64, value: f64, limit: f64) -> bool {
    sign * value + WINDOW_EPSILON >= sign * limit
}

/// `value` lies past `limit` along an axis running in direction `sign`.
#[inline]
fn exceeds(sign: f64, value: f64, limit: f64) -> bool {
    sign * value - WINDOW_EPSILON > sign * limit
}

/// Whole pixels covered by a world-space `span` at `pixel_size` world units per
/// pixel; never less than one so the World stays initialized on sub-pixel
/// remainders.
#[inline]
fn pixel_span(span: f64, pixel_size: f64) -> u32 {
    (((span / pixel_size).abs() + PIXEL_TRUNCATION_BIAS) as u32).max(1)
}
