//! Hachure fill: one rough stroke per interior segment.

use crate::geometry::Point;
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::double_line;

use super::scanline::hachure_lines;

/// Rough strokes along the hachure lines at `angle_degrees`.
pub(super) fn fill(
    polygons: &[Vec<Point>],
    angle_degrees: f64,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> Vec<Op> {
    hachure_lines(polygons, o.hachure_gap, angle_degrees)
        .into_iter()
        .flat_map(|line| double_line(line.start(), line.end(), o, rng))
        .collect()
}
