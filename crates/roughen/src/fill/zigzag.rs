//! Zigzag fill: hachure segments joined into continuous back-and-forth paths.
//!
//! Rows are visited in scan order, alternating direction, so the end of one
//! row sits next to the start of the following one. A connector is drawn only
//! when it stays inside the polygon set; otherwise the chain breaks and a new
//! sub-path starts. Concave shapes therefore come out as several chains.

use crate::clip::segment_inside;
use crate::geometry::Point;
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::continuous_path;

use super::scanline::hachure_rows;

/// Point chains through the hachure segments, in drawing order.
pub(super) fn chains(polygons: &[Vec<Point>], gap: f64, angle_degrees: f64) -> Vec<Vec<Point>> {
    let mut chains = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (k, row) in hachure_rows(polygons, gap, angle_degrees).iter().enumerate() {
        let oriented: Vec<(Point, Point)> = if k % 2 == 0 {
            row.iter().map(|l| (l.start(), l.end())).collect()
        } else {
            row.iter().rev().map(|l| (l.end(), l.start())).collect()
        };

        for (a, b) in oriented {
            match current.last() {
                Some(&end) if segment_inside(end, a, polygons) => {
                    current.push(a);
                    current.push(b);
                }
                _ => {
                    if current.len() >= 2 {
                        chains.push(std::mem::take(&mut current));
                    }
                    current = vec![a, b];
                }
            }
        }
    }
    if current.len() >= 2 {
        chains.push(current);
    }
    chains
}

pub(super) fn fill(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let mut ops = Vec::new();
    for chain in chains(polygons, o.hachure_gap, o.hachure_angle) {
        ops.extend(continuous_path(&chain, false, o, rng));
        if !o.disable_multi_stroke {
            ops.extend(continuous_path(&chain, false, o, rng));
        }
    }
    ops
}
