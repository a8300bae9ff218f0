//! Sketchy/hand-drawn stroke generation.
//!
//! Turns exact primitives into jittered path ops. Based on the RoughJS
//! algorithms:
//! - Endpoint randomization scaled by roughness and edge length
//! - Line bowing through randomized cubic control points
//! - Double-stroke overlay pass
//! - Catmull-Rom smoothing of jittered sample points for curves and ellipses
//!
//! Every function draws from the passed [`RandomSource`] in a fixed order, so
//! output is a pure function of the inputs and the source state.
//!
//! # Example
//! ```
//! use roughen::geometry::Point;
//! use roughen::options::Options;
//! use roughen::rng::RandomSource;
//! use roughen::sketch;
//!
//! let o = Options::new().resolve().unwrap();
//! let mut rng = RandomSource::new(42).unwrap();
//! let ops = sketch::double_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &o, &mut rng);
//! assert_eq!(ops.len(), 4); // two passes of move + cubic
//! ```

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::geometry::Point;
use crate::ops::Op;
use crate::options::{MAX_CURVE_STEPS, ResolvedOptions};
use crate::path::PathSegment;
use crate::rng::RandomSource;

/// Roughness-scaled offset in `[-x, x)`.
#[inline]
fn jitter(x: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> f64 {
    rng.offset(x, o.roughness, 1.0)
}

#[inline]
fn jitter_point(p: Point, x: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> Point {
    let dx = jitter(x, o, rng);
    let dy = jitter(x, o, rng);
    Point::new(p.x + dx, p.y + dy)
}

// ============================================================================
// LINES
// ============================================================================

/// One jittered pass over the edge `p1 -> p2`: a move plus one cubic.
///
/// The overlay pass uses half the offset so the two strokes stay close.
/// With `move_to` false the move is skipped, continuing the current path.
pub fn line_ops(
    p1: Point,
    p2: Point,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
    move_to: bool,
    overlay: bool,
) -> Vec<Op> {
    let len_sq = (p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2);
    let len = len_sq.sqrt();

    // Long edges get proportionally less wobble
    let gain = if len > 500.0 {
        0.4
    } else if len >= 200.0 {
        -0.0016668 * len + 1.233334
    } else {
        1.0
    };

    let mut offset = o.max_randomness_offset;
    if offset * offset * 100.0 > len_sq {
        offset = len / 10.0;
    }
    let half = offset / 2.0;
    let diverge = 0.2 + rng.next_f64() * 0.2;

    let mid_x = rng.offset(o.bowing * offset * (p2.y - p1.y) / 200.0, o.roughness, gain);
    let mid_y = rng.offset(o.bowing * offset * (p1.x - p2.x) / 200.0, o.roughness, gain);

    let amount = if overlay { half } else { offset };
    let r = |rng: &mut RandomSource| rng.offset(amount, o.roughness, gain);

    let mut ops = Vec::with_capacity(2);
    if move_to {
        let start = if o.preserve_vertices {
            p1
        } else {
            let dx = r(rng);
            let dy = r(rng);
            Point::new(p1.x + dx, p1.y + dy)
        };
        ops.push(Op::Move(start));
    }

    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let c1 = Point::new(
        mid_x + p1.x + dx * diverge + r(rng),
        mid_y + p1.y + dy * diverge + r(rng),
    );
    let c2 = Point::new(
        mid_x + p1.x + 2.0 * dx * diverge + r(rng),
        mid_y + p1.y + 2.0 * dy * diverge + r(rng),
    );
    let to = if o.preserve_vertices {
        p2
    } else {
        let ex = r(rng);
        let ey = r(rng);
        Point::new(p2.x + ex, p2.y + ey)
    };
    ops.push(Op::CubicTo { c1, c2, to });
    ops
}

/// Base pass plus overlay pass, unless multi-stroke is disabled.
///
/// Fill callers pass options from [`ResolvedOptions::for_fill`], which carry
/// the fill multi-stroke switch.
pub fn double_line(p1: Point, p2: Point, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let mut ops = line_ops(p1, p2, o, rng, true, false);
    if !o.disable_multi_stroke {
        ops.extend(line_ops(p1, p2, o, rng, true, true));
    }
    ops
}

/// A polyline, optionally closed back to its first point.
pub fn linear_path(points: &[Point], close: bool, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    match points.len() {
        0 | 1 => Vec::new(),
        2 => double_line(points[0], points[1], o, rng),
        n => {
            let mut ops = Vec::with_capacity(n * 4);
            for pair in points.windows(2) {
                ops.extend(double_line(pair[0], pair[1], o, rng));
            }
            if close {
                ops.extend(double_line(points[n - 1], points[0], o, rng));
            }
            ops
        }
    }
}

pub fn polygon(points: &[Point], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    linear_path(points, true, o, rng)
}

/// Corner points of a rectangle, clockwise in screen space from `(x, y)`.
pub fn rectangle_points(x: f64, y: f64, width: f64, height: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ]
}

pub fn rectangle(x: f64, y: f64, width: f64, height: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    polygon(&rectangle_points(x, y, width, height), o, rng)
}

/// One continuous jittered pass through `points`, back to the start when
/// `close` is set. Used where a fill needs an unbroken sub-path.
pub fn continuous_path(points: &[Point], close: bool, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let start = if o.preserve_vertices { first } else { jitter_point(first, o.max_randomness_offset, o, rng) };

    let mut ops = Vec::with_capacity(points.len() + 1);
    ops.push(Op::Move(start));
    for pair in points.windows(2) {
        ops.extend(line_ops(pair[0], pair[1], o, rng, false, false));
    }
    if close && points.len() > 2 {
        // finish exactly where the pass started so the ring is closed
        ops.push(Op::LineTo(start));
    }
    ops
}

// ============================================================================
// CURVES
// ============================================================================

/// Catmull-Rom smoothing of `points` into cubic ops.
///
/// The first and last points only steer the tangents; the drawn curve runs
/// from `points[1]` to `points[len - 2]`.
pub fn curve_ops(points: &[Point], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let s = 1.0 - o.curve_tightness;
    match points.len() {
        0 | 1 => Vec::new(),
        2 => line_ops(points[0], points[1], o, rng, true, true),
        3 => vec![
            Op::Move(points[1]),
            Op::CubicTo { c1: points[1], c2: points[2], to: points[2] },
        ],
        n => {
            let mut ops = Vec::with_capacity(n - 2);
            ops.push(Op::Move(points[1]));
            for i in 1..n - 2 {
                let (prev, cur, next, after) = (points[i - 1], points[i], points[i + 1], points[i + 2]);
                let c1 = Point::new(
                    cur.x + s * (next.x - prev.x) / 6.0,
                    cur.y + s * (next.y - prev.y) / 6.0,
                );
                let c2 = Point::new(
                    next.x + s * (cur.x - after.x) / 6.0,
                    next.y + s * (cur.y - after.y) / 6.0,
                );
                ops.push(Op::CubicTo { c1, c2, to: next });
            }
            ops
        }
    }
}

/// Jitter every input point by up to `offset`, then smooth.
///
/// The first point is sampled twice and the last point repeated so the
/// smoothed curve spans the whole input.
pub fn curve_with_offset(points: &[Point], offset: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut ps = Vec::with_capacity(points.len() + 2);
    ps.push(jitter_point(first, offset, o, rng));
    ps.push(jitter_point(first, offset, o, rng));
    for (i, &p) in points.iter().enumerate().skip(1) {
        let q = jitter_point(p, offset, o, rng);
        ps.push(q);
        if i == points.len() - 1 {
            ps.push(q);
        }
    }
    curve_ops(&ps, o, rng)
}

/// A smooth curve through `points`: base pass plus optional overlay.
pub fn curve(points: &[Point], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let base = 1.0 + o.roughness * 0.2;
    let mut ops = curve_with_offset(points, base, o, rng);
    if !o.disable_multi_stroke {
        let overlay = 1.5 * (1.0 + o.roughness * 0.22);
        ops.extend(curve_with_offset(points, overlay, o, rng));
    }
    ops
}

// ============================================================================
// ELLIPSES
// ============================================================================

/// Jittered radii and angular step shared by both ellipse passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    pub rx: f64,
    pub ry: f64,
    pub increment: f64,
}

/// Pick the sample step from the ellipse size and jitter the radii.
pub fn ellipse_params(width: f64, height: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> EllipseParams {
    let steps = o.curve_step_count as f64;
    let perimeter_sq = (TAU * (((width / 2.0).powi(2) + (height / 2.0).powi(2)) / 2.0).sqrt()).sqrt();
    let step_count = steps
        .max((steps / 200f64.sqrt() * perimeter_sq).floor())
        .min(MAX_CURVE_STEPS as f64);
    let increment = TAU / step_count;

    let mut rx = (width / 2.0).abs();
    let mut ry = (height / 2.0).abs();
    let fit = 1.0 - o.curve_fitting;
    rx += jitter(rx * fit, o, rng);
    ry += jitter(ry * fit, o, rng);

    EllipseParams { rx, ry, increment }
}

/// Sample points around an ellipse.
///
/// Returns `(all, core)`: `all` carries the lead-in and overlapping tail the
/// smoother needs; `core` is the perimeter proper, used as the fill polygon.
fn ellipse_points(
    center: Point,
    ep: &EllipseParams,
    offset: f64,
    overlap: f64,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> (Vec<Point>, Vec<Point>) {
    let EllipseParams { rx, ry, increment } = *ep;
    let at = |scale: f64, angle: f64| {
        Point::new(center.x + scale * rx * angle.cos(), center.y + scale * ry * angle.sin())
    };

    let mut all = Vec::new();
    let mut core = Vec::new();

    if o.roughness == 0.0 {
        let inc = increment / 4.0;
        all.push(at(1.0, -inc));
        let steps = (TAU / inc).floor() as usize;
        for i in 0..=steps {
            let p = at(1.0, i as f64 * inc);
            core.push(p);
            all.push(p);
        }
        all.push(at(1.0, 0.0));
        all.push(at(1.0, inc));
        return (all, core);
    }

    let rad_offset = jitter(0.5, o, rng) - FRAC_PI_2;
    let lead = at(0.9, rad_offset - increment);
    all.push(jitter_point(lead, offset, o, rng));

    let end_angle = TAU + rad_offset - 0.01;
    for i in 0usize.. {
        let angle = rad_offset + i as f64 * increment;
        if angle >= end_angle {
            break;
        }
        let p = jitter_point(at(1.0, angle), offset, o, rng);
        core.push(p);
        all.push(p);
    }

    all.push(jitter_point(at(1.0, rad_offset + TAU + overlap * 0.5), offset, o, rng));
    all.push(jitter_point(at(0.98, rad_offset + overlap), offset, o, rng));
    all.push(jitter_point(at(0.9, rad_offset + overlap * 0.5), offset, o, rng));
    (all, core)
}

/// Ellipse outline ops plus the sampled perimeter for filling.
pub fn ellipse_with_params(
    center: Point,
    ep: &EllipseParams,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> (Vec<Op>, Vec<Point>) {
    let inner = rng.offset_range(0.4, 1.0, o.roughness, 1.0);
    let overlap = ep.increment * rng.offset_range(0.1, inner, o.roughness, 1.0);
    let (all, core) = ellipse_points(center, ep, 1.0, overlap, o, rng);
    let mut ops = curve_ops(&all, o, rng);

    if !o.disable_multi_stroke && o.roughness != 0.0 {
        let (all2, _) = ellipse_points(center, ep, 1.5, 0.0, o, rng);
        ops.extend(curve_ops(&all2, o, rng));
    }
    (ops, core)
}

pub fn ellipse(center: Point, width: f64, height: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let ep = ellipse_params(width, height, o, rng);
    ellipse_with_params(center, &ep, o, rng).0
}

// ============================================================================
// ARCS
// ============================================================================

/// Arc angles with `start` reduced into `[0, TAU)` and the span kept.
///
/// Spans beyond a full turn are clamped to one.
fn normalize_arc(start: f64, stop: f64) -> (f64, f64) {
    let span = stop - start;
    if span > TAU {
        return (0.0, TAU);
    }
    let start = start.rem_euclid(TAU);
    (start, start + span)
}

fn arc_radii(width: f64, height: f64, o: &ResolvedOptions, rng: &mut RandomSource) -> (f64, f64) {
    let rx = (width / 2.0).abs();
    let ry = (height / 2.0).abs();
    (rx + jitter(rx * 0.01, o, rng), ry + jitter(ry * 0.01, o, rng))
}

fn arc_pass(
    increment: f64,
    center: Point,
    (rx, ry): (f64, f64),
    (start, stop): (f64, f64),
    offset: f64,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> Vec<Op> {
    let at = |scale: f64, angle: f64| {
        Point::new(center.x + scale * rx * angle.cos(), center.y + scale * ry * angle.sin())
    };

    // the lead-in may wobble by at most half the span, and never past the end
    let span = stop - start;
    let rad_offset =
        (start + jitter(0.1_f64.min(span / 2.0), o, rng)).clamp(start - span / 2.0, stop);
    let steps = if increment > 0.0 { ((stop - rad_offset) / increment).floor() as usize } else { 0 };

    let mut points = Vec::with_capacity(steps + 4);
    points.push(at(0.9, rad_offset - increment));
    for i in 0..=steps {
        points.push(jitter_point(at(1.0, rad_offset + i as f64 * increment), offset, o, rng));
    }
    points.push(at(1.0, stop));
    points.push(at(1.0, stop));
    curve_ops(&points, o, rng)
}

/// Elliptical arc from `start` to `stop` radians; `closed` draws the wedge
/// sides back to the centre.
#[allow(clippy::too_many_arguments)]
pub fn arc(
    center: Point,
    width: f64,
    height: f64,
    start: f64,
    stop: f64,
    closed: bool,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> Vec<Op> {
    let radii = arc_radii(width, height, o, rng);
    let (start, stop) = normalize_arc(start, stop);
    let increment = (TAU / o.curve_step_count as f64 / 2.0).min((stop - start) / 2.0);

    let mut ops = arc_pass(increment, center, radii, (start, stop), 1.0, o, rng);
    if !o.disable_multi_stroke {
        ops.extend(arc_pass(increment, center, radii, (start, stop), 1.5, o, rng));
    }
    if closed {
        let (rx, ry) = radii;
        let edge = |angle: f64| Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin());
        ops.extend(double_line(center, edge(start), o, rng));
        ops.extend(double_line(center, edge(stop), o, rng));
    }
    ops
}

/// Fill polygon of a closed arc: the perimeter plus the centre.
pub fn arc_fill_polygon(
    center: Point,
    width: f64,
    height: f64,
    start: f64,
    stop: f64,
    o: &ResolvedOptions,
    rng: &mut RandomSource,
) -> Vec<Point> {
    let (rx, ry) = arc_radii(width, height, o, rng);
    let (start, stop) = normalize_arc(start, stop);
    let increment = (stop - start) / o.curve_step_count as f64;
    let at = |angle: f64| Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin());

    let steps = o.curve_step_count as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.extend((0..steps).map(|i| at(start + i as f64 * increment)));
    points.push(at(stop));
    points.push(center);
    points
}

// ============================================================================
// PATHS
// ============================================================================

/// Jittered cubic: one pass, or two with the second slightly rougher.
pub fn cubic_ops(from: Point, c1: Point, c2: Point, to: Point, o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let passes = if o.disable_multi_stroke { 1 } else { 2 };
    let base = o.max_randomness_offset;
    let shift = |p: Point, amount: f64, rng: &mut RandomSource| {
        if o.preserve_vertices { p } else { jitter_point(p, amount, o, rng) }
    };

    let mut ops = Vec::with_capacity(passes * 2);
    for pass in 0..passes {
        let amount = if pass == 0 { base } else { base + 0.3 };
        let start = if pass == 0 { from } else { shift(from, base, rng) };
        ops.push(Op::Move(start));
        ops.push(Op::CubicTo {
            c1: shift(c1, amount, rng),
            c2: shift(c2, amount, rng),
            to: shift(to, amount, rng),
        });
    }
    ops
}

/// Degree-elevate a quadratic to the equivalent cubic control points.
#[inline]
pub fn quad_to_cubic(from: Point, ctrl: Point, to: Point) -> (Point, Point) {
    let c1 = Point::new(from.x + 2.0 / 3.0 * (ctrl.x - from.x), from.y + 2.0 / 3.0 * (ctrl.y - from.y));
    let c2 = Point::new(to.x + 2.0 / 3.0 * (ctrl.x - to.x), to.y + 2.0 / 3.0 * (ctrl.y - to.y));
    (c1, c2)
}

/// Sketch a segment list. With multi-stroke disabled the path is replayed
/// exactly.
pub fn path(segments: &[PathSegment], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    let crisp = o.disable_multi_stroke;
    let mut ops = Vec::with_capacity(segments.len() * 4);
    let mut current = Point::default();
    let mut first = current;

    let line = |ops: &mut Vec<Op>, from: Point, to: Point, rng: &mut RandomSource| {
        if crisp {
            ops.push(Op::LineTo(to));
        } else {
            ops.extend(double_line(from, to, o, rng));
        }
    };

    for seg in segments {
        match *seg {
            PathSegment::MoveTo(p) => {
                ops.push(Op::Move(p));
                current = p;
                first = p;
            }
            PathSegment::LineTo(p) => {
                line(&mut ops, current, p, rng);
                current = p;
            }
            PathSegment::CubicTo { c1, c2, to } => {
                if crisp {
                    ops.push(Op::CubicTo { c1, c2, to });
                } else {
                    ops.extend(cubic_ops(current, c1, c2, to, o, rng));
                }
                current = to;
            }
            PathSegment::QuadTo { ctrl, to } => {
                let (c1, c2) = quad_to_cubic(current, ctrl, to);
                if crisp {
                    ops.push(Op::CubicTo { c1, c2, to });
                } else {
                    ops.extend(cubic_ops(current, c1, c2, to, o, rng));
                }
                current = to;
            }
            PathSegment::Close => {
                line(&mut ops, current, first, rng);
                current = first;
            }
        }
    }
    ops
}

// ============================================================================
// TESTS
// ============================================================================
