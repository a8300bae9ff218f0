//! Dashed fill: hachure lines cut into evenly spaced dashes.
//!
//! Each line gets as many `dash_offset + dash_gap` periods as fit, and the run
//! of dashes is centred so both ends keep the same margin.

use crate::geometry::{Line, Point};
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::double_line;

use super::scanline::hachure_lines;

/// Dashes along one line as `(start, end)` pairs, left end first.
fn dashes(line: &Line, dash: f64, gap: f64) -> Vec<(Point, Point)> {
    let (mut p1, mut p2) = (line.start(), line.end());
    if p1.x > p2.x {
        std::mem::swap(&mut p1, &mut p2);
    }
    let len = line.length();
    let period = dash + gap;
    let count = (len / period).floor() as usize;
    let margin = (len + gap - count as f64 * period) / 2.0;

    let (sin_a, cos_a) = (p2.y - p1.y).atan2(p2.x - p1.x).sin_cos();
    let along = |d: f64| Point::new(p1.x + d * cos_a, p1.y + d * sin_a);

    (0..count)
        .map(|i| {
            let start = margin + i as f64 * period;
            (along(start), along(start + dash))
        })
        .collect()
}

pub(super) fn fill(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let mut ops = Vec::new();
    for line in hachure_lines(polygons, o.hachure_gap, o.hachure_angle) {
        for (a, b) in dashes(&line, o.dash_offset, o.dash_gap) {
            ops.extend(double_line(a, b, o, rng));
        }
    }
    ops
}
