//! Dot fill: small rough ellipses scattered on a jittered grid.
//!
//! The grid spacing is `hachure_gap + fill_weight`; every grid point is nudged
//! by up to a quarter of the spacing and kept only when it lands inside the
//! polygon set. Grids that would hold more than [`MAX_DOTS`] cells are
//! spread out until they fit.

use log::warn;

use crate::clip::point_in_polygons;
use crate::geometry::{Bounds, Point};
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::ellipse;

/// Most grid cells one dot fill will visit.
pub const MAX_DOTS: f64 = 262_144.0;

/// Grid positions along an extent: the first half a step in, then every
/// `spacing` while still inside.
fn grid_count(extent: f64, spacing: f64) -> usize {
    if extent < spacing / 2.0 {
        0
    } else {
        ((extent - spacing / 2.0) / spacing).floor() as usize + 1
    }
}

/// Jittered grid points inside the set.
pub(super) fn dot_centres(polygons: &[Vec<Point>], spacing: f64, rng: &mut RandomSource) -> Vec<Point> {
    let Some(bounds) = Bounds::of_points(polygons.iter().flatten()) else {
        return Vec::new();
    };
    let floor = bounds.width().sqrt() * bounds.height().sqrt() / MAX_DOTS.sqrt();
    let spacing = if spacing < floor {
        warn!("dot spacing {spacing:e} too fine for the fill area, widening to {floor:e}");
        floor
    } else {
        spacing
    };
    let ro = spacing / 4.0;

    let rows = grid_count(bounds.height(), spacing);
    let cols = grid_count(bounds.width(), spacing);
    let mut centres = Vec::new();
    for j in 0..rows {
        let y = bounds.min_y + spacing / 2.0 + j as f64 * spacing;
        for i in 0..cols {
            let x = bounds.min_x + spacing / 2.0 + i as f64 * spacing;
            let c = Point::new(x + rng.next_range(-ro, ro), y + rng.next_range(-ro, ro));
            if point_in_polygons(c, polygons) {
                centres.push(c);
            }
        }
    }
    centres
}

pub(super) fn fill(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let weight = o.fill_weight;
    let mut ops = Vec::new();
    for c in dot_centres(polygons, o.hachure_gap + weight, rng) {
        ops.extend(ellipse(c, weight, weight, o, rng));
    }
    ops
}
