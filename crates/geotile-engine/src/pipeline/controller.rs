use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{MaskCanvas, SharedCanvas};
use crate::coords::Subset;
use crate::element::ElementList;
use crate::progress::{LoggingProgressFactory, ProgressFactory, ProgressTotal};
use crate::render::{RendererKind, TileRenderer};
use crate::tiling::{MovingWindow, TilingConfig};
use crate::world::{ObserverId, World};

/// Lifecycle of a [`RenderPipeline`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    Uninitialized,
    Initialized,
    /// Renderers torn down; `initialize` starts a new cycle.
    Finalized,
}

/// A renderer owned by the pipeline, with its registration on the World.
struct Attached {
    renderer: Rc<RefCell<TileRenderer>>,
    observer: Option<ObserverId>,
}

/// Renders a World's extent into a caller-owned canvas, one tile at a time.
///
/// The list, mask list, World and canvas are the caller's; the pipeline keeps
/// shared handles to them across `finalize`. Renderers and the mask canvas are
/// built by `initialize` and dropped by `finalize`. `render` always finalizes, so
/// each call is one complete cycle.
pub struct RenderPipeline {
    list: Option<Rc<ElementList>>,
    mask_list: Option<Rc<ElementList>>,
    world: Option<Rc<World>>,
    canvas: Option<SharedCanvas>,

    renderer: Option<Attached>,
    mask_renderer: Option<Attached>,
    mask_canvas: Option<Rc<RefCell<MaskCanvas>>>,

    moving_window: MovingWindow,
    progress: Box<dyn ProgressFactory>,
    state: PipelineState,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::with_config(TilingConfig::default())
    }

    pub fn with_config(config: TilingConfig) -> Self {
        Self {
            list: None,
            mask_list: None,
            world: None,
            canvas: None,
            renderer: None,
            mask_renderer: None,
            mask_canvas: None,
            moving_window: MovingWindow::new(config),
            progress: Box::new(LoggingProgressFactory::default()),
            state: PipelineState::Uninitialized,
        }
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn tiling_config(&self) -> TilingConfig {
        self.moving_window.config()
    }

    pub fn set_progress_factory(&mut self, factory: Box<dyn ProgressFactory>) {
        self.progress = factory;
    }

    // ── inputs ────────────────────────────────────────────────────────────

    pub fn set_list(&mut self, list: Option<Rc<ElementList>>) {
        self.finalize_if_initialized();
        self.list = list;
    }

    pub fn set_mask_list(&mut self, mask_list: Option<Rc<ElementList>>) {
        self.finalize_if_initialized();
        self.mask_list = mask_list;
    }

    /// Stores `world` and points its window at the whole extent.
    pub fn set_world(&mut self, world: Option<Rc<World>>) {
        self.finalize_if_initialized();
        if let Some(world) = &world {
            self.moving_window.reset_to_extent(world);
        }
        self.world = world;
    }

    pub fn set_output_canvas(&mut self, canvas: Option<SharedCanvas>) {
        self.finalize_if_initialized();
        self.canvas = canvas;
    }

    pub fn list(&self) -> Option<&Rc<ElementList>> {
        self.list.as_ref()
    }

    pub fn mask_list(&self) -> Option<&Rc<ElementList>> {
        self.mask_list.as_ref()
    }

    pub fn world(&self) -> Option<&Rc<World>> {
        self.world.as_ref()
    }

    pub fn output_canvas(&self) -> Option<&SharedCanvas> {
        self.canvas.as_ref()
    }

    /// List, canvas and an initialized World are all present.
    pub fn is_ready(&self) -> bool {
        self.list.is_some()
            && self.canvas.is_some()
            && self.world.as_ref().is_some_and(|w| w.is_initialized())
    }

    // ── tile size ─────────────────────────────────────────────────────────

    /// Sets the tile size on the current World. See [`MovingWindow::set_buffer_size`].
    pub fn set_buffer_size(&self, pixels: u32, lines: u32) -> bool {
        match &self.world {
            Some(world) => self.moving_window.set_buffer_size(world, pixels, lines),
            None => {
                log::debug!("set_buffer_size: no world set");
                false
            }
        }
    }

    pub fn set_best_buffer_size(&self) -> bool {
        match &self.world {
            Some(world) => self.moving_window.set_best_buffer_size(world),
            None => {
                log::debug!("set_best_buffer_size: no world set");
                false
            }
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Builds the renderers and registers them on the World, the mask renderer
    /// first. Returns `false` when the pipeline is not ready; calling it again
    /// while initialized is a no-op.
    pub fn initialize(&mut self) -> bool {
        if !self.is_ready() {
            log::debug!("render pipeline: list, canvas or initialized world missing");
            return false;
        }
        if self.renderer.is_some() && (self.mask_list.is_none() || self.mask_renderer.is_some()) {
            return true;
        }
        let (Some(list), Some(world), Some(canvas)) =
            (self.list.clone(), self.world.clone(), self.canvas.clone())
        else {
            return false;
        };

        // Partial state from an interrupted cycle.
        self.teardown();

        let mask = match self.mask_list.clone() {
            Some(mask_list) => {
                let mask_canvas = Rc::new(RefCell::new(MaskCanvas::new(mask_list.no_data())));
                let mut renderer = TileRenderer::new(RendererKind::Mask, mask_list, &world);
                renderer.set_world_extent_manager(None);
                renderer.set_mask_canvas(Some(Rc::clone(&mask_canvas)));
                Some((Rc::new(RefCell::new(renderer)), mask_canvas))
            }
            None => None,
        };

        let mut renderer = TileRenderer::new(RendererKind::Primary, list, &world);
        renderer.set_world_extent_manager(None);
        renderer.set_canvas(Some(canvas));
        renderer.set_mask(mask.as_ref().map(|(_, canvas)| Rc::clone(canvas)));
        let renderer = Rc::new(RefCell::new(renderer));

        if let Some((mask_renderer, mask_canvas)) = mask {
            let observer = TileRenderer::attach(&mask_renderer);
            self.mask_renderer = Some(Attached { renderer: mask_renderer, observer });
            self.mask_canvas = Some(mask_canvas);
        }
        let observer = TileRenderer::attach(&renderer);
        self.renderer = Some(Attached { renderer, observer });

        self.state = PipelineState::Initialized;
        log::debug!(
            "render pipeline initialized (mask: {})",
            if self.mask_renderer.is_some() { "yes" } else { "no" }
        );
        true
    }

    /// Sweeps the World's extent and renders every tile. Returns `false` on a
    /// missing input, a failed tile or cancellation.
    pub fn render(&mut self) -> bool {
        if !self.initialize() {
            return false;
        }
        let ok = self.do_render();
        if !ok {
            log::debug!("render pipeline: sweep aborted");
        }
        self.finalize();
        ok
    }

    /// Detaches and drops the renderers and the mask canvas. The caller's inputs
    /// stay set. No-op unless initialized.
    pub fn finalize(&mut self) {
        if self.state != PipelineState::Initialized {
            return;
        }
        self.teardown();
        self.state = PipelineState::Finalized;
        log::debug!("render pipeline finalized");
    }

    /// `true` when the primary renderer's last tile succeeded and so did the mask
    /// renderer's, if there is one. `false` without a primary renderer.
    pub fn renderization_status(&self) -> bool {
        let Some(primary) = &self.renderer else {
            return false;
        };
        primary.renderer.borrow().status()
            && self
                .mask_renderer
                .as_ref()
                .is_none_or(|mask| mask.renderer.borrow().status())
    }

    pub fn renderer(&self) -> Option<&Rc<RefCell<TileRenderer>>> {
        self.renderer.as_ref().map(|a| &a.renderer)
    }

    pub fn mask_renderer(&self) -> Option<&Rc<RefCell<TileRenderer>>> {
        self.mask_renderer.as_ref().map(|a| &a.renderer)
    }

    pub fn mask_canvas(&self) -> Option<&Rc<RefCell<MaskCanvas>>> {
        self.mask_canvas.as_ref()
    }

    fn finalize_if_initialized(&mut self) {
        if self.state == PipelineState::Initialized {
            self.finalize();
        }
    }

    fn teardown(&mut self) {
        if let Some(world) = self.world.clone() {
            self.detach_observers(&world);
        }
        if let Some(primary) = self.renderer.take() {
            let mut renderer = primary.renderer.borrow_mut();
            renderer.set_canvas(None);
            renderer.set_mask(None);
        }
        self.mask_renderer = None;
        self.mask_canvas = None;
    }

    /// Stops the renderers from reacting to World changes. Safe to repeat.
    fn detach_observers(&mut self, world: &World) {
        for attached in [&mut self.mask_renderer, &mut self.renderer].into_iter().flatten() {
            if let Some(id) = attached.observer.take() {
                world.detach(id);
            }
        }
    }

    // ── sweep ─────────────────────────────────────────────────────────────

    fn do_render(&mut self) -> bool {
        let Some(world) = self.world.clone() else {
            return false;
        };
        let mut progress = self.progress.create(ProgressTotal::Indeterminate, "rendering tiles");

        let mut previous = Subset::EMPTY;
        loop {
            {
                // One notification per tile, after the window and viewport settle.
                let _batch = world.batch();
                let Some(next) = self.moving_window.next_window(&world, &previous) else {
                    // The restore is announced when the batch ends; the tiles are
                    // already drawn, so the renderers sit it out.
                    self.detach_observers(&world);
                    break;
                };
                world.set_window(next);
                previous = next;
            }

            if progress.update() {
                log::info!("render pipeline: cancelled");
                return false;
            }
            if !self.renderization_status() {
                log::debug!("render pipeline: tile {previous:?} failed");
                return false;
            }
        }
        true
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.finalize();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::coords::Viewport;
    use crate::element::{NoDataConfig, RasterElement};
    use crate::paint::Rgba8;
    use crate::progress::{CancelFlag, ProgressReporter};
    use crate::world::{WorldObserver, WorldView};

    const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    /// 100 x 100 world units over a 100 x 100 raster: band value 0 for x < 50,
    /// 1 elsewhere.
    fn halves(no_data: NoDataConfig) -> Rc<ElementList> {
        let band = (0..100 * 100).map(|i| if i % 100 < 50 { 0.0 } else { 1.0 }).collect();
        let raster =
            RasterElement::new("halves", Subset::new(0.0, 0.0, 100.0, 100.0), 100, 100, vec![band])
                .unwrap();
        let mut list = ElementList::new().with_no_data(no_data);
        list.push(raster);
        Rc::new(list)
    }

    fn world() -> Rc<World> {
        Rc::new(World::new(Subset::new(0.0, 0.0, 100.0, 100.0), Viewport::new(100, 100)))
    }

    fn canvas() -> Rc<RefCell<MemoryCanvas>> {
        Rc::new(RefCell::new(MemoryCanvas::new(100, 100)))
    }

    fn ready_pipeline(world: &Rc<World>, out: &Rc<RefCell<MemoryCanvas>>) -> RenderPipeline {
        let mut p = RenderPipeline::new();
        p.set_list(Some(halves(NoDataConfig::default())));
        p.set_world(Some(Rc::clone(world)));
        p.set_output_canvas(Some(out.clone()));
        p
    }

    /// Requests cancellation on the `cancel_at`-th update.
    struct StopAt {
        cancel_at: u32,
        calls: Rc<Cell<u32>>,
    }

    impl ProgressReporter for StopAt {
        fn update(&mut self) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.calls.get() >= self.cancel_at
        }
    }

    struct StopAtFactory {
        cancel_at: u32,
        calls: Rc<Cell<u32>>,
    }

    impl ProgressFactory for StopAtFactory {
        fn create(&self, _total: ProgressTotal, _label: &str) -> Box<dyn ProgressReporter> {
            Box::new(StopAt { cancel_at: self.cancel_at, calls: Rc::clone(&self.calls) })
        }
    }

    // ── readiness ─────────────────────────────────────────────────────────

    #[test]
    fn initialize_requires_every_input() {
        let world = world();
        let mut p = RenderPipeline::new();
        assert!(!p.initialize());
        p.set_list(Some(halves(NoDataConfig::default())));
        p.set_world(Some(Rc::clone(&world)));
        assert!(!p.is_ready());
        assert!(!p.render());

        p.set_output_canvas(Some(canvas()));
        assert!(p.is_ready());
        assert!(p.initialize());
        assert_eq!(p.state(), PipelineState::Initialized);
    }

    #[test]
    fn uninitialized_world_is_rejected() {
        let mut p = RenderPipeline::new();
        p.set_list(Some(halves(NoDataConfig::default())));
        p.set_world(Some(Rc::new(World::default())));
        p.set_output_canvas(Some(canvas()));
        assert!(!p.render());
        assert_eq!(p.state(), PipelineState::Uninitialized);
    }

    #[test]
    fn set_world_resets_window_to_extent() {
        let world = world();
        world.set_window(Subset::new(0.0, 0.0, 10.0, 10.0));
        let mut p = RenderPipeline::new();
        p.set_world(Some(Rc::clone(&world)));
        assert_eq!(world.window(), world.extent());
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn initialize_twice_keeps_renderers() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        p.set_mask_list(Some(halves(NoDataConfig::new(0.0, true, true))));

        assert!(p.initialize());
        let first = Rc::clone(p.renderer().unwrap());
        assert!(p.initialize());

        assert!(Rc::ptr_eq(&first, p.renderer().unwrap()));
        assert_eq!(world.observer_count(), 2);
    }

    #[test]
    fn finalize_twice_is_a_no_op() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());

        p.finalize();
        assert_eq!(p.state(), PipelineState::Finalized);
        assert!(p.renderer().is_none());
        assert_eq!(world.observer_count(), 0);
        assert!(matches!(renderer.borrow().target(), crate::render::RenderTarget::None));
        assert!(!renderer.borrow().has_mask());

        p.finalize();
        assert_eq!(p.state(), PipelineState::Finalized);
        // Inputs survive teardown.
        assert!(p.is_ready());
    }

    #[test]
    fn setters_finalize_an_initialized_pipeline() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.initialize());

        p.set_output_canvas(Some(canvas()));
        assert_eq!(p.state(), PipelineState::Finalized);
        assert_eq!(world.observer_count(), 0);
        assert!(p.initialize());
    }

    #[test]
    fn mask_renderer_is_built_first_and_never_resizes_world() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        // The mask list covers less than the World; an enabled extent manager would
        // shrink the World to it.
        let mut mask_list = ElementList::new().with_no_data(NoDataConfig::new(0.0, true, true));
        mask_list.push(
            RasterElement::new("small", Subset::new(0.0, 0.0, 10.0, 10.0), 1, 1, vec![vec![1.0]])
                .unwrap(),
        );
        p.set_mask_list(Some(Rc::new(mask_list)));

        assert!(p.initialize());
        assert_eq!(world.extent(), Subset::new(0.0, 0.0, 100.0, 100.0));

        let mask = p.mask_renderer().unwrap().borrow();
        assert_eq!(mask.kind(), RendererKind::Mask);
        assert!(!mask.has_world_extent_manager());
        assert!(!p.renderer().unwrap().borrow().has_world_extent_manager());
        assert!(p.renderer().unwrap().borrow().has_mask());
        assert_eq!(p.mask_canvas().unwrap().borrow().no_data(), NoDataConfig::new(0.0, true, true));
    }

    // ── status ────────────────────────────────────────────────────────────

    #[test]
    fn status_needs_primary_and_mask() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(!p.renderization_status());

        p.set_mask_list(Some(halves(NoDataConfig::new(0.0, true, true))));
        assert!(p.initialize());
        assert!(p.renderization_status());

        // A render against an uninitialized view fails and records `false`.
        p.mask_renderer().unwrap().borrow_mut().render(&WorldView::default());
        assert!(!p.renderization_status());

        p.mask_renderer().unwrap().borrow_mut().render(&world.view());
        assert!(p.renderization_status());

        p.renderer().unwrap().borrow_mut().render(&WorldView::default());
        assert!(!p.renderization_status());
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn renders_every_tile_and_restores_world() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(40, 40));
        let before = world.view();

        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());
        assert!(p.render());

        assert_eq!(renderer.borrow().tiles_rendered(), 9);
        assert_eq!(p.state(), PipelineState::Finalized);
        assert_eq!(world.view(), before);
        assert_eq!(world.observer_count(), 0);

        let out = out.borrow();
        assert_eq!(out.pixel(0, 0), Some(BLACK));
        assert_eq!(out.pixel(49, 99), Some(BLACK));
        assert_eq!(out.pixel(50, 0), Some(WHITE));
        assert_eq!(out.pixel(99, 99), Some(WHITE));
        assert!(out.pixels().iter().all(|px| px.a == 255));
    }

    struct Recorder(Rc<RefCell<Vec<WorldView>>>);

    impl WorldObserver for Recorder {
        fn world_changed(&mut self, view: &WorldView) {
            self.0.borrow_mut().push(*view);
        }
    }

    #[test]
    fn other_observers_see_the_restore() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(40, 40));
        let before = world.view();
        let seen = Rc::new(RefCell::new(Vec::new()));
        world.attach(Rc::new(RefCell::new(Recorder(Rc::clone(&seen)))));

        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());
        assert!(p.render());

        // Nine tiles, then the restore; the renderers skip the restore.
        let seen = seen.borrow();
        assert_eq!(seen.len(), 10);
        assert_eq!(seen[9], before);
        assert_eq!(renderer.borrow().tiles_rendered(), 9);
    }

    #[test]
    fn fractional_scale_render_fills_canvas() {
        // 100 units over 1025 pixels: 256 px tiles leave one-pixel edge tiles.
        let world = Rc::new(World::new(Subset::new(0.0, 0.0, 100.0, 100.0), Viewport::new(1025, 1025)));
        let out = Rc::new(RefCell::new(MemoryCanvas::new(1025, 1025)));
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(256, 256));

        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());
        assert!(p.render());

        assert_eq!(renderer.borrow().tiles_rendered(), 25);
        let out = out.borrow();
        assert!(out.pixels().iter().all(|px| px.a == 255));
        assert_eq!(out.pixel(1024, 1024), Some(WHITE));
        assert_eq!(out.pixel(0, 1024), Some(BLACK));
    }

    #[test]
    fn mask_gates_no_data_pixels() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        p.set_mask_list(Some(halves(NoDataConfig::new(0.0, true, true))));
        assert!(p.set_buffer_size(40, 40));

        assert!(p.render());

        let out = out.borrow();
        assert_eq!(out.pixel(10, 10), Some(Rgba8::TRANSPARENT));
        assert_eq!(out.pixel(49, 90), Some(Rgba8::TRANSPARENT));
        assert_eq!(out.pixel(50, 90), Some(WHITE));
    }

    #[test]
    fn cancellation_stops_after_the_requesting_update() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(40, 40));
        let calls = Rc::new(Cell::new(0));
        p.set_progress_factory(Box::new(StopAtFactory { cancel_at: 2, calls: Rc::clone(&calls) }));

        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());
        assert!(!p.render());

        assert_eq!(calls.get(), 2);
        // The starting tile, then the one step past it.
        assert_eq!(renderer.borrow().tiles_rendered(), 2);
        // An aborted sweep leaves the World on its last tile.
        assert_eq!(world.window(), Subset::new(40.0, 0.0, 80.0, 40.0));
        // The rest of the canvas stays untouched.
        assert_eq!(out.borrow().pixel(90, 10), Some(Rgba8::TRANSPARENT));
        assert_eq!(p.state(), PipelineState::Finalized);
    }

    #[test]
    fn cancel_flag_aborts_default_progress() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        let flag = CancelFlag::new();
        flag.cancel();
        p.set_progress_factory(Box::new(LoggingProgressFactory::new(flag)));
        assert!(!p.render());
    }

    #[test]
    fn failed_tile_aborts_sweep() {
        let world = world();
        // Too small for anything past the first tile.
        let out = Rc::new(RefCell::new(MemoryCanvas::new(40, 40)));
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(40, 40));

        assert!(p.initialize());
        let renderer = Rc::clone(p.renderer().unwrap());
        assert!(!p.render());

        assert_eq!(renderer.borrow().tiles_rendered(), 2);
        assert!(!renderer.borrow().status());
        assert_eq!(out.borrow().pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn render_can_run_again_after_finalize() {
        let world = world();
        let out = canvas();
        let mut p = ready_pipeline(&world, &out);
        assert!(p.set_buffer_size(40, 40));
        assert!(p.render());
        assert!(p.render());
        assert_eq!(p.state(), PipelineState::Finalized);
    }
}
