//! Zigzag-line fill: each hachure line redrawn as a row of small triangles.

use std::f64::consts::FRAC_PI_4;

use crate::geometry::{Line, Point};
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::double_line;

use super::scanline::hachure_lines;

/// Zigzag strokes along one line: `round(len / 2zo)` teeth of side `zo`.
fn teeth(line: &Line, zo: f64) -> Vec<(Point, Point)> {
    let (mut p1, mut p2) = (line.start(), line.end());
    if p1.x > p2.x {
        std::mem::swap(&mut p1, &mut p2);
    }
    let count = (line.length() / (2.0 * zo)).round() as usize;
    let alpha = (p2.y - p1.y).atan2(p2.x - p1.x);
    let dz = (2.0 * zo * zo).sqrt();
    let along = |d: f64| Point::new(p1.x + d * alpha.cos(), p1.y + d * alpha.sin());

    let mut strokes = Vec::with_capacity(count * 2);
    for i in 0..count {
        let start = along(i as f64 * 2.0 * zo);
        let end = along((i + 1) as f64 * 2.0 * zo);
        let peak = Point::new(
            start.x + dz * (alpha + FRAC_PI_4).cos(),
            start.y + dz * (alpha + FRAC_PI_4).sin(),
        );
        strokes.push((start, peak));
        strokes.push((peak, end));
    }
    strokes
}

pub(super) fn fill(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let zo = o.zigzag_offset;
    let mut ops = Vec::new();
    for line in hachure_lines(polygons, o.hachure_gap + zo, o.hachure_angle) {
        for (a, b) in teeth(&line, zo) {
            ops.extend(double_line(a, b, o, rng));
        }
    }
    ops
}
