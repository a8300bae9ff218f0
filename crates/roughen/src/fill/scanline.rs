//! Scanline hachure: interior segments of a polygon set along parallel lines.
//!
//! The whole set is moved to a local origin (its first vertex) and rotated so
//! the hachure direction becomes horizontal, then swept from the lowest point
//! upward in steps of `gap`. On each scanline the edge crossings are sorted and
//! paired (even-odd), and each pair is one interior segment, rotated back and
//! moved into place.
//!
//! Scanline `i` sits at `min_y + i * gap`. Stepping by repeated addition
//! stalls once `gap` drops below the spacing of floats near `y`.
//!
//! ## Rust Lesson #17: f64 Methods
//!
//! `f64::total_cmp` gives a total order over floats, so sorting crossings
//! needs no `partial_cmp(..).unwrap()` and cannot panic on NaN.

use log::warn;

use crate::geometry::{Line, Point};

/// Most scanlines one sweep will lay down; finer gaps are widened to fit.
pub const MAX_ROWS: usize = 4096;

/// A rotation about the origin with cached sine and cosine.
#[derive(Clone, Copy)]
pub struct Rotation {
    cos_a: f64,
    sin_a: f64,
}

impl Rotation {
    pub fn new(angle_rad: f64) -> Self {
        let (sin_a, cos_a) = angle_rad.sin_cos();
        Self { cos_a, sin_a }
    }

    /// Create from degrees instead of radians.
    pub fn from_degrees(angle_degrees: f64) -> Self {
        Self::new(angle_degrees.to_radians())
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.cos_a - p.y * self.sin_a, p.x * self.sin_a + p.y * self.cos_a)
    }

    #[inline]
    pub fn inverse(&self) -> Rotation {
        Rotation { cos_a: self.cos_a, sin_a: -self.sin_a }
    }
}

/// Interior segments grouped by scanline, lowest scanline first.
///
/// Within a row segments run in increasing x of the rotated frame. Lines for
/// hachure angle `a` are laid out in a frame rotated by `a + 90` degrees.
pub fn hachure_rows(polygons: &[Vec<Point>], gap: f64, angle_degrees: f64) -> Vec<Vec<Line>> {
    let to_frame = Rotation::from_degrees(angle_degrees + 90.0);
    let from_frame = to_frame.inverse();
    let Some(origin) = polygons.iter().find(|ring| ring.len() >= 3).map(|ring| ring[0]) else {
        return Vec::new();
    };
    let to_local = |p: Point| to_frame.apply(Point::new(p.x - origin.x, p.y - origin.y));
    let to_world = |p: Point| {
        let q = from_frame.apply(p);
        Point::new(q.x + origin.x, q.y + origin.y)
    };

    // ## Rust Lesson #14: Iterators & Collecting
    //
    // Every ring contributes its closing edge too, so `(i + 1) % n` wraps.
    let edges: Vec<(Point, Point)> = polygons
        .iter()
        .filter(|ring| ring.len() >= 3)
        .flat_map(|ring| {
            let n = ring.len();
            (0..n).map(move |i| (to_local(ring[i]), to_local(ring[(i + 1) % n])))
        })
        .collect();

    let Some((min_y, max_y)) = edges
        .iter()
        .map(|(a, _)| a.y)
        .fold(None, |acc: Option<(f64, f64)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    else {
        return Vec::new();
    };

    let span = max_y - min_y;
    let gap = if span / gap > MAX_ROWS as f64 {
        warn!("hachure gap {gap:e} too fine for a {span:e} sweep, widening to {:e}", span / MAX_ROWS as f64);
        span / MAX_ROWS as f64
    } else {
        gap
    };
    let steps = (span / gap).floor() as usize;
    let mut rows = Vec::new();
    let mut xs: Vec<f64> = Vec::new();
    for i in 0..=steps {
        let y = min_y + i as f64 * gap;
        xs.clear();
        for (a, b) in &edges {
            // half-open in y: horizontal edges never cross
            if (a.y > y) != (b.y > y) {
                xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        xs.sort_by(f64::total_cmp);

        let row: Vec<Line> = xs
            .chunks_exact(2)
            .filter(|pair| pair[1] - pair[0] > 1e-9)
            .map(|pair| {
                Line::from_points(to_world(Point::new(pair[0], y)), to_world(Point::new(pair[1], y)))
            })
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}

/// All interior segments, flattened.
pub fn hachure_lines(polygons: &[Vec<Point>], gap: f64, angle_degrees: f64) -> Vec<Line> {
    hachure_rows(polygons, gap, angle_degrees).into_iter().flatten().collect()
}

// ============================================================================
// TESTS
// ============================================================================
