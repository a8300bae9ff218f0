//! Containment tests for fill polygons.
//!
//! Fill polygons come in sets (a glyph with its counters, a path with several
//! sub-paths) and are always read with the even-odd rule: a point is inside
//! when a ray from it crosses the set's boundary an odd number of times.

use crate::geometry::Point;

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================
//
// ## Rust Lesson #8: References & Slices
//
// `&[Point]` is a "slice" - a borrowed view into a contiguous sequence.
// `&[Vec<Point>]` is a slice of owned rings: the whole polygon set.

/// Count how many edges of `ring` a rightward ray from `p` crosses.
///
/// Uses the half-open rule `(y1 > y) != (y2 > y)`, the same one the scanline
/// filler uses, so the two never disagree about a vertex.
#[inline]
fn ray_crossings(p: Point, ring: &[Point]) -> usize {
    let n = ring.len();
    if n < 3 {
        return 0;
    }

    let mut crossings = 0;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if ((a.y > p.y) != (b.y > p.y)) && (p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x) {
            crossings += 1;
        }
        j = i;
    }
    crossings
}

/// Test if a point is inside a single polygon using ray casting.
#[inline]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    ray_crossings(p, polygon) % 2 == 1
}

/// Even-odd test against a whole polygon set.
///
/// Nested rings cancel out, so a counter inside an outline is outside.
pub fn point_in_polygons(p: Point, polygons: &[Vec<Point>]) -> bool {
    polygons.iter().map(|ring| ray_crossings(p, ring)).sum::<usize>() % 2 == 1
}

// ============================================================================
// SEGMENT-BOUNDARY CROSSING
// ============================================================================

/// Parameter `t` along `a -> b` where it properly crosses `c -> d`, if any.
///
/// Parallel segments never cross.
#[inline]
fn segment_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<f64> {
    let denom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);
    if denom.abs() < 1e-10 {
        return None;
    }

    let ua = ((d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x)) / denom;
    let ub = ((b.x - a.x) * (a.y - c.y) - (b.y - a.y) * (a.x - c.x)) / denom;

    ((0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)).then_some(ua)
}

/// Distance from `p` to the segment `a -> b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-18 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// True when `p` lies within `tolerance` of any ring's boundary.
pub fn on_boundary(p: Point, polygons: &[Vec<Point>], tolerance: f64) -> bool {
    polygons.iter().any(|ring| {
        let n = ring.len();
        (0..n).any(|i| distance_to_segment(p, ring[i], ring[(i + 1) % n]) <= tolerance)
    })
}

/// True when the open segment `a -> b` stays inside the polygon set.
///
/// Touching the boundary is allowed, including running along an edge; any
/// crossing strictly between the endpoints is not.
pub fn segment_inside(a: Point, b: Point, polygons: &[Vec<Point>]) -> bool {
    const EPS: f64 = 1e-9;

    let mid = a.midpoint(b);
    if !point_in_polygons(mid, polygons) && !on_boundary(mid, polygons, 1e-6) {
        return false;
    }

    !polygons.iter().any(|ring| {
        let n = ring.len();
        (0..n).any(|i| {
            let (c, d) = (ring[i], ring[(i + 1) % n]);
            segment_intersection(a, b, c, d).is_some_and(|t| t > EPS && t < 1.0 - EPS)
        })
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn point_inside_square() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &sq));
    }

    #[test]
    fn nested_ring_is_a_hole() {
        let set = vec![square(0.0, 0.0, 30.0), square(10.0, 10.0, 10.0)];
        assert!(point_in_polygons(Point::new(5.0, 5.0), &set));
        assert!(!point_in_polygons(Point::new(15.0, 15.0), &set));
    }

    #[test]
    fn disjoint_rings_both_count() {
        let set = vec![square(0.0, 0.0, 10.0), square(20.0, 0.0, 10.0)];
        assert!(point_in_polygons(Point::new(5.0, 5.0), &set));
        assert!(point_in_polygons(Point::new(25.0, 5.0), &set));
        assert!(!point_in_polygons(Point::new(15.0, 5.0), &set));
    }

    #[test]
    fn segment_across_notch_is_outside() {
        // U shape: the notch between the arms is open at the top
        let u = vec![vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ]];
        assert!(!segment_inside(Point::new(5.0, 20.0), Point::new(25.0, 20.0), &u));
        assert!(segment_inside(Point::new(5.0, 5.0), Point::new(25.0, 5.0), &u));
        // endpoints on the boundary are fine
        assert!(segment_inside(Point::new(0.0, 5.0), Point::new(30.0, 5.0), &u));
        // so is running along an edge
        assert!(segment_inside(Point::new(30.0, 5.0), Point::new(30.0, 25.0), &u));
    }

    #[test]
    fn boundary_distance() {
        let sq = vec![square(0.0, 0.0, 10.0)];
        assert!(on_boundary(Point::new(10.0, 4.0), &sq, 1e-9));
        assert!(on_boundary(Point::new(0.0, 0.0), &sq, 1e-9));
        assert!(!on_boundary(Point::new(5.0, 5.0), &sq, 1e-3));
    }

    #[test]
    fn segment_intersection_test() {
        let t = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert!((t.unwrap() - 0.5).abs() < 1e-10);

        // Parallel lines
        let t = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        );
        assert!(t.is_none());
    }
}
