use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::canvas::{MaskCanvas, SharedCanvas};
use crate::coords::Coordinates;
use crate::element::{Element, ElementList};
use crate::paint::{Color, Rgba8};
use crate::world::{ObserverId, SharedObserver, World, WorldObserver, WorldView};

use super::{FitToElements, WorldExtentManager};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererKind {
    Primary,
    Mask,
}

/// Where a renderer puts its pixels.
#[derive(Clone, Default)]
pub enum RenderTarget {
    #[default]
    None,
    Output(SharedCanvas),
    Mask(Rc<RefCell<MaskCanvas>>),
}

/// Renders the World's current window from an element list.
///
/// Status starts `true` and reflects the most recent tile afterwards.
pub struct TileRenderer {
    kind: RendererKind,
    list: Rc<ElementList>,
    world: Weak<World>,
    target: RenderTarget,
    mask: Option<Rc<RefCell<MaskCanvas>>>,
    extent_manager: Option<Box<dyn WorldExtentManager>>,
    status: bool,
    tiles_rendered: u64,
    scratch: Vec<Rgba8>,
}

impl TileRenderer {
    /// Creates a renderer bound to `list` and `world`, with `FitToElements` as its
    /// world-extent manager.
    pub fn new(kind: RendererKind, list: Rc<ElementList>, world: &Rc<World>) -> Self {
        Self {
            kind,
            list,
            world: Rc::downgrade(world),
            target: RenderTarget::None,
            mask: None,
            extent_manager: Some(Box::new(FitToElements)),
            status: true,
            tiles_rendered: 0,
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> RendererKind {
        self.kind
    }

    #[inline]
    pub fn status(&self) -> bool {
        self.status
    }

    #[inline]
    pub fn tiles_rendered(&self) -> u64 {
        self.tiles_rendered
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn set_canvas(&mut self, canvas: Option<SharedCanvas>) {
        self.target = canvas.map_or(RenderTarget::None, RenderTarget::Output);
    }

    pub fn set_mask_canvas(&mut self, mask: Option<Rc<RefCell<MaskCanvas>>>) {
        self.target = mask.map_or(RenderTarget::None, RenderTarget::Mask);
    }

    /// Gates output pixels with a mask filled by another renderer.
    pub fn set_mask(&mut self, mask: Option<Rc<RefCell<MaskCanvas>>>) {
        self.mask = mask;
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// `None` disables resizing of the World by this renderer.
    pub fn set_world_extent_manager(&mut self, manager: Option<Box<dyn WorldExtentManager>>) {
        self.extent_manager = manager;
    }

    pub fn has_world_extent_manager(&self) -> bool {
        self.extent_manager.is_some()
    }

    /// Applies the extent manager (if any) and registers `renderer` as a World
    /// observer. Returns `None` when the World is gone.
    pub fn attach(renderer: &Rc<RefCell<TileRenderer>>) -> Option<ObserverId> {
        let world = renderer.borrow().world.upgrade()?;
        {
            let mut r = renderer.borrow_mut();
            let list = Rc::clone(&r.list);
            if let Some(manager) = r.extent_manager.as_mut() {
                manager.update_extent(&world, &list);
            }
        }
        let observer: SharedObserver = renderer.clone();
        Some(world.attach(observer))
    }

    /// Renders the tile described by `view` and records the outcome as status.
    pub fn render(&mut self, view: &WorldView) -> bool {
        self.status = if !view.is_initialized() {
            log::debug!("{:?} renderer: world view not initialized", self.kind);
            false
        } else {
            match self.target.clone() {
                RenderTarget::None => {
                    log::debug!("{:?} renderer has no target", self.kind);
                    false
                }
                RenderTarget::Output(canvas) => self.render_output(view, &canvas),
                RenderTarget::Mask(mask) => self.render_mask(view, &mask),
            }
        };
        self.tiles_rendered += 1;
        self.status
    }

    fn render_mask(&mut self, view: &WorldView, mask: &Rc<RefCell<MaskCanvas>>) -> bool {
        let Ok(mut mask) = mask.try_borrow_mut() else {
            log::warn!("mask renderer: mask canvas is borrowed elsewhere");
            return false;
        };
        mask.resize(view.viewport);
        let no_data = mask.no_data();
        if !no_data.available {
            return true;
        }

        for py in 0..view.viewport.height {
            for px in 0..view.viewport.width {
                let p = pixel_centre(view, px, py);
                let mut covered = false;
                let mut has_data = false;
                for element in self.list.active() {
                    if let Element::Raster(raster) = element {
                        if let Some(sample) = raster.sample(p) {
                            covered = true;
                            if !no_data.is_no_data(sample.values()) {
                                has_data = true;
                                break;
                            }
                        }
                    }
                }
                if covered && !has_data {
                    mask.set(px, py, false);
                }
            }
        }
        true
    }

    fn render_output(&mut self, view: &WorldView, canvas: &SharedCanvas) -> bool {
        let vp = view.viewport;
        let w = &view.window;
        let pixel_size = Coordinates::new(
            (w.lr.x - w.ul.x) / f64::from(vp.width),
            (w.lr.y - w.ul.y) / f64::from(vp.height),
        );

        let mut pixels = std::mem::take(&mut self.scratch);
        pixels.clear();
        pixels.reserve(vp.area());
        {
            let mask = self.mask.as_ref().map(|m| m.borrow());
            for py in 0..vp.height {
                for px in 0..vp.width {
                    if mask.as_ref().is_some_and(|m| !m.is_valid(px, py)) {
                        pixels.push(Rgba8::TRANSPARENT);
                        continue;
                    }
                    let p = pixel_centre(view, px, py);
                    pixels.push(composite(&self.list, p, pixel_size).to_rgba8());
                }
            }
        }

        let ok = self.write_tile(view, canvas, &pixels);
        self.scratch = pixels;
        ok
    }

    fn write_tile(&self, view: &WorldView, canvas: &SharedCanvas, pixels: &[Rgba8]) -> bool {
        let (ox, oy) = view.tile_offset();
        let (Ok(x), Ok(y)) = (u32::try_from(ox), u32::try_from(oy)) else {
            log::warn!("{:?} renderer: tile offset ({ox}, {oy}) is outside the canvas", self.kind);
            return false;
        };
        let Ok(mut canvas) = canvas.try_borrow_mut() else {
            log::warn!("{:?} renderer: output canvas is borrowed elsewhere", self.kind);
            return false;
        };
        match canvas.write_region(x, y, view.viewport.width, view.viewport.height, pixels) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{:?} renderer: {e}", self.kind);
                false
            }
        }
    }
}

impl WorldObserver for TileRenderer {
    fn world_changed(&mut self, view: &WorldView) {
        self.render(view);
    }
}

#[inline]
fn pixel_centre(view: &WorldView, px: u32, py: u32) -> Coordinates {
    view.inverse_transform(Coordinates::new(f64::from(px) + 0.5, f64::from(py) + 0.5))
}

/// Back-to-front source-over of every active element at `p`.
fn composite(list: &ElementList, p: Coordinates, pixel_size: Coordinates) -> Color {
    let no_data = list.no_data();
    list.active().fold(Color::transparent(), |acc, element| match element {
        Element::Raster(raster) => raster
            .color_at(p, &no_data)
            .map_or(acc, |c| c.over(acc)),
        Element::Vector(vector) if vector.covers(p, pixel_size) => vector.color().over(acc),
        Element::Vector(_) => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::coords::{Subset, Viewport};
    use crate::element::{NoDataConfig, RasterElement, VectorElement};

    const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    /// 4x4 world units over a 4x4 raster: left half 0 (black), right half 1 (white).
    fn split_list(no_data: NoDataConfig) -> Rc<ElementList> {
        let mut list = ElementList::new().with_no_data(no_data);
        let band = (0..16).map(|i| if i % 4 < 2 { 0.0 } else { 1.0 }).collect();
        list.push(RasterElement::new("split", Subset::new(0.0, 0.0, 4.0, 4.0), 4, 4, vec![band]).unwrap());
        Rc::new(list)
    }

    fn world() -> Rc<World> {
        Rc::new(World::new(Subset::new(0.0, 0.0, 4.0, 4.0), Viewport::new(4, 4)))
    }

    fn canvas(w: u32, h: u32) -> Rc<RefCell<MemoryCanvas>> {
        Rc::new(RefCell::new(MemoryCanvas::new(w, h)))
    }

    fn tile_view(window: Subset, w: u32, h: u32) -> WorldView {
        WorldView {
            extent: Subset::new(0.0, 0.0, 4.0, 4.0),
            window,
            viewport: Viewport::new(w, h),
        }
    }

    // ── primary ───────────────────────────────────────────────────────────

    #[test]
    fn renders_full_window_into_canvas() {
        let world = world();
        let out = canvas(4, 4);
        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        r.set_canvas(Some(out.clone()));

        assert!(r.render(&world.view()));
        assert_eq!(r.tiles_rendered(), 1);
        let out = out.borrow();
        assert_eq!(out.pixel(0, 0), Some(BLACK));
        assert_eq!(out.pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn tile_lands_at_its_offset() {
        let world = world();
        let out = canvas(4, 4);
        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        r.set_canvas(Some(out.clone()));

        assert!(r.render(&tile_view(Subset::new(2.0, 2.0, 4.0, 4.0), 2, 2)));

        let out = out.borrow();
        assert_eq!(out.pixel(2, 2), Some(WHITE));
        assert_eq!(out.pixel(3, 3), Some(WHITE));
        assert_eq!(out.pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn no_target_fails() {
        let world = world();
        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        assert!(r.status());
        assert!(!r.render(&world.view()));
        assert!(!r.status());
    }

    #[test]
    fn tile_outside_canvas_fails() {
        let world = world();
        let out = canvas(2, 2);
        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        r.set_canvas(Some(out));
        assert!(!r.render(&world.view()));
    }

    #[test]
    fn vector_markers_draw_on_top() {
        let world = world();
        let out = canvas(4, 4);
        let mut list = (*split_list(NoDataConfig::default())).clone();
        let red = Color::from_straight(1.0, 0.0, 0.0, 1.0);
        list.push(VectorElement::new("pt", vec![Coordinates::new(0.5, 0.5)], 0.5, red));
        let mut r = TileRenderer::new(RendererKind::Primary, Rc::new(list), &world);
        r.set_canvas(Some(out.clone()));

        assert!(r.render(&world.view()));
        assert_eq!(out.borrow().pixel(0, 0), Some(Rgba8::new(255, 0, 0, 255)));
        assert_eq!(out.borrow().pixel(1, 1), Some(BLACK));
    }

    // ── mask ──────────────────────────────────────────────────────────────

    #[test]
    fn mask_marks_no_data_pixels_invalid() {
        let world = world();
        let list = split_list(NoDataConfig::new(0.0, true, true));
        let mask = Rc::new(RefCell::new(MaskCanvas::new(list.no_data())));
        let mut r = TileRenderer::new(RendererKind::Mask, list, &world);
        r.set_mask_canvas(Some(mask.clone()));

        assert!(r.render(&world.view()));
        let mask = mask.borrow();
        assert_eq!(mask.size(), Viewport::new(4, 4));
        assert!(!mask.is_valid(0, 0));
        assert!(mask.is_valid(3, 0));
        assert_eq!(mask.valid_count(), 8);
    }

    #[test]
    fn mask_without_no_data_value_keeps_everything() {
        let world = world();
        let list = split_list(NoDataConfig::default());
        let mask = Rc::new(RefCell::new(MaskCanvas::new(list.no_data())));
        let mut r = TileRenderer::new(RendererKind::Mask, list, &world);
        r.set_mask_canvas(Some(mask.clone()));

        assert!(r.render(&world.view()));
        assert_eq!(mask.borrow().valid_count(), 16);
    }

    #[test]
    fn primary_skips_masked_pixels() {
        let world = world();
        let out = canvas(4, 4);
        let mut mask = MaskCanvas::new(NoDataConfig::default());
        mask.resize(Viewport::new(4, 4));
        mask.set(3, 3, false);

        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        r.set_canvas(Some(out.clone()));
        r.set_mask(Some(Rc::new(RefCell::new(mask))));

        assert!(r.render(&world.view()));
        assert_eq!(out.borrow().pixel(3, 3), Some(Rgba8::TRANSPARENT));
        assert_eq!(out.borrow().pixel(3, 2), Some(WHITE));
    }

    // ── world wiring ──────────────────────────────────────────────────────

    #[test]
    fn attached_renderer_renders_on_window_change() {
        let world = world();
        let out = canvas(4, 4);
        let r = Rc::new(RefCell::new(TileRenderer::new(
            RendererKind::Primary,
            split_list(NoDataConfig::default()),
            &world,
        )));
        r.borrow_mut().set_canvas(Some(out.clone()));
        r.borrow_mut().set_world_extent_manager(None);

        let id = TileRenderer::attach(&r).unwrap();
        {
            let _batch = world.batch();
            world.set_viewport(2, 2);
            world.set_window(Subset::new(0.0, 0.0, 2.0, 2.0));
        }

        assert_eq!(r.borrow().tiles_rendered(), 1);
        assert_eq!(out.borrow().pixel(1, 1), Some(BLACK));
        assert!(world.detach(id));
    }

    #[test]
    fn attach_applies_enabled_extent_manager() {
        let world = Rc::new(World::new(Subset::new(0.0, 0.0, 1.0, 1.0), Viewport::new(4, 4)));
        let r = Rc::new(RefCell::new(TileRenderer::new(
            RendererKind::Primary,
            split_list(NoDataConfig::default()),
            &world,
        )));
        assert!(r.borrow().has_world_extent_manager());

        TileRenderer::attach(&r).unwrap();
        assert_eq!(world.extent(), Subset::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(world.observer_count(), 1);
    }

    #[test]
    fn attach_fails_once_world_is_gone() {
        let world = world();
        let r = Rc::new(RefCell::new(TileRenderer::new(
            RendererKind::Mask,
            split_list(NoDataConfig::default()),
            &world,
        )));
        drop(world);
        assert!(TileRenderer::attach(&r).is_none());
    }

    #[test]
    fn canvas_trait_object_is_accepted() {
        let world = world();
        let out: SharedCanvas = canvas(4, 4);
        let mut r = TileRenderer::new(RendererKind::Primary, split_list(NoDataConfig::default()), &world);
        r.set_canvas(Some(out.clone()));
        assert!(r.render(&world.view()));
        assert_eq!(out.borrow().size(), Viewport::new(4, 4));
    }
}
