//! Synthetic terrain used by the demo.

use std::rc::Rc;

use anyhow::Result;
use geotile_engine::coords::{Coordinates, Subset};
use geotile_engine::element::{ElementList, NoDataConfig, RasterElement, VectorElement};
use geotile_engine::paint::{Color, ColorRamp, ColorStop, SpreadMode};

/// Elevation samples inside the lake carry this value.
pub const NO_DATA: f64 = -9999.0;

const SIZE: u32 = 200;

/// North-up extent of the scene, in metres.
pub fn extent() -> Subset {
    Subset::new(0.0, 3000.0, 4000.0, 0.0)
}

/// Primary list (terrain plus survey points) and the mask list gating the lake out.
pub fn build() -> Result<(Rc<ElementList>, Rc<ElementList>)> {
    let no_data = NoDataConfig::new(NO_DATA, true, true);

    let terrain = RasterElement::new("terrain", extent(), SIZE, SIZE * 3 / 4, vec![elevation()])?
        .with_range(0.0, 1200.0)
        .with_ramp(terrain_ramp());

    let mut mask = ElementList::new().with_no_data(no_data);
    mask.push(terrain.clone());

    let mut list = ElementList::new().with_no_data(no_data);
    list.push(terrain);
    list.push(VectorElement::new(
        "survey points",
        vec![
            Coordinates::new(600.0, 2400.0),
            Coordinates::new(1800.0, 700.0),
            Coordinates::new(3300.0, 2100.0),
        ],
        4.0,
        Color::from_straight(0.9, 0.1, 0.1, 1.0),
    ));

    log::debug!("scene: {} primary elements, {} mask elements", list.len(), mask.len());
    Ok((Rc::new(list), Rc::new(mask)))
}

fn elevation() -> Vec<f64> {
    let (w, h) = (SIZE, SIZE * 3 / 4);
    let mut band = Vec::with_capacity(w as usize * h as usize);
    for row in 0..h {
        for col in 0..w {
            let x = f64::from(col) / f64::from(w);
            let y = f64::from(row) / f64::from(h);
            let lake = (x - 0.3).powi(2) + (y - 0.65).powi(2) < 0.015;
            band.push(if lake {
                NO_DATA
            } else {
                600.0
                    + 350.0 * (x * 7.0).sin() * (y * 5.0).cos()
                    + 250.0 * ((x + y) * 3.0).sin()
            });
        }
    }
    band
}

fn terrain_ramp() -> ColorRamp {
    ColorRamp::new(
        vec![
            ColorStop::new(0.0, Color::from_straight(0.13, 0.35, 0.17, 1.0)),
            ColorStop::new(0.45, Color::from_straight(0.55, 0.62, 0.28, 1.0)),
            ColorStop::new(0.75, Color::from_straight(0.52, 0.38, 0.24, 1.0)),
            ColorStop::new(1.0, Color::from_straight(0.96, 0.96, 0.96, 1.0)),
        ],
        SpreadMode::Pad,
    )
}
