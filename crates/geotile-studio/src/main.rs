//! Renders a synthetic terrain scene through the tiled pipeline into a PNG.

mod config;
mod scene;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, ensure};
use geotile_engine::canvas::MemoryCanvas;
use geotile_engine::coords::Viewport;
use geotile_engine::logging::{LoggingConfig, init_logging};
use geotile_engine::{RenderPipeline, World};

use clap::Parser;
use config::StudioConfig;

fn main() -> Result<()> {
    let config = StudioConfig::parse();
    init_logging(LoggingConfig::with_verbosity(config.verbose));

    let (list, mask) = scene::build()?;
    let viewport = Viewport::new(config.width, config.height);
    let world = Rc::new(World::new(scene::extent(), viewport));
    let canvas = Rc::new(RefCell::new(MemoryCanvas::new(viewport.width, viewport.height)));

    let mut pipeline = RenderPipeline::new();
    pipeline.set_list(Some(list));
    pipeline.set_mask_list(Some(mask));
    pipeline.set_world(Some(Rc::clone(&world)));
    pipeline.set_output_canvas(Some(canvas.clone()));

    ensure!(
        pipeline.set_buffer_size(config.tile_size, config.tile_size),
        "cannot use {0}x{0} tiles",
        config.tile_size
    );
    log::info!(
        "rendering {}x{} px in tiles of at most {} px",
        viewport.width,
        viewport.height,
        config.tile_size
    );
    ensure!(pipeline.render(), "rendering failed or was cancelled");

    let canvas = canvas.borrow();
    image::save_buffer(
        &config.output,
        canvas.as_bytes(),
        viewport.width,
        viewport.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("writing {}", config.output.display()))?;

    log::info!("wrote {}", config.output.display());
    Ok(())
}
