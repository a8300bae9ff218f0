//! Pattern fills for closed shapes.
//!
//! Every style works on a *polygon set*: one or more closed rings read with
//! the even-odd rule, so a glyph's counters or a path's inner sub-paths stay
//! empty. Styles are dispatched from the closed [`FillStyle`] enum:
//!
//! - `hachure`, `cross-hatch`: rough parallel strokes
//! - `zigzag`: hachure strokes chained into continuous back-and-forth paths
//! - `zigzag-line`: hachure strokes replaced by small zigzags
//! - `dots`: small rough ellipses on a jittered grid
//! - `dashed`: hachure strokes cut into centred dashes
//! - `solid`: a rough retrace of each ring, painted as a filled region

mod dashed;
mod dots;
mod hachure;
pub mod scanline;
mod solid;
mod zigzag;
mod zigzag_line;

use log::{trace, warn};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, open_ring, signed_area_of_points};
use crate::ops::{Op, OpSet, OpSetKind};
use crate::options::{FillStyle, ResolvedOptions};
use crate::rng::RandomSource;

/// Rings whose area is below this fraction of their squared extent are
/// treated as collinear.
const MIN_RELATIVE_AREA: f64 = 1e-8;

/// Most pattern pieces (teeth, dashes) one fill may lay down.
const MAX_PIECES: f64 = 1_048_576.0;

/// Ring area relative to the square of its larger bounding-box side.
///
/// Measured around the first vertex with the ring scaled to unit extent, so
/// the result does not depend on where the ring sits or how big it is.
fn relative_area(ring: &[Point]) -> f64 {
    let Some(b) = Bounds::of_points(ring) else {
        return 0.0;
    };
    let extent = b.width().max(b.height());
    if !(extent > 0.0) {
        return 0.0;
    }
    let origin = ring[0];
    let unit: Vec<Point> = ring
        .iter()
        .map(|p| Point::new((p.x - origin.x) / extent, (p.y - origin.y) / extent))
        .collect();
    signed_area_of_points(&unit).abs()
}

/// Clean up a polygon set before filling.
///
/// Drops repeated closing points and consecutive duplicates, then skips rings
/// that cannot enclose anything. Fails when nothing with interior area is
/// left. Draws no randomness.
pub fn prepare(polygons: &[Vec<Point>], shape: &'static str) -> Result<Vec<Vec<Point>>> {
    let mut kept = Vec::with_capacity(polygons.len());
    for (i, ring) in polygons.iter().enumerate() {
        if !ring.iter().all(Point::is_finite) {
            return Err(Error::geometry(shape, "fill polygon has a non-finite coordinate"));
        }
        let mut ring = open_ring(ring).to_vec();
        ring.dedup();

        let area = relative_area(&ring);
        if ring.len() < 3 || area <= MIN_RELATIVE_AREA {
            warn!("{shape}: skipping degenerate fill contour {i} ({} points, relative area {area:e})", ring.len());
            continue;
        }
        kept.push(ring);
    }

    if kept.is_empty() {
        return Err(Error::geometry(shape, "fill polygons enclose no area"));
    }
    Ok(kept)
}

/// Fill a prepared polygon set in the configured style.
///
/// `o` are the shape's options; fill strokes derive their own from them.
/// Styles that find nothing to draw contribute no op set.
pub fn fill_polygons(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<OpSet> {
    let fo = within_budget(o.for_fill(), polygons);
    let sketch = |ops: Vec<Op>| OpSet::new(OpSetKind::FillSketch, ops);

    let sets: Vec<OpSet> = match fo.fill_style {
        FillStyle::Hachure => sketch(hachure::fill(polygons, fo.hachure_angle, &fo, rng))
            .into_iter()
            .collect(),
        FillStyle::CrossHatch => {
            let first = sketch(hachure::fill(polygons, fo.hachure_angle, &fo, rng));
            let second = sketch(hachure::fill(polygons, fo.hachure_angle + 90.0, &fo, rng));
            first.into_iter().chain(second).collect()
        }
        FillStyle::ZigZag => sketch(zigzag::fill(polygons, &fo, rng)).into_iter().collect(),
        FillStyle::ZigZagLine => sketch(zigzag_line::fill(polygons, &fo, rng)).into_iter().collect(),
        FillStyle::Dots => sketch(dots::fill(polygons, &fo, rng)).into_iter().collect(),
        FillStyle::Dashed => sketch(dashed::fill(polygons, &fo, rng)).into_iter().collect(),
        FillStyle::Solid => OpSet::new(OpSetKind::FillPath, solid::fill(polygons, &fo, rng))
            .into_iter()
            .collect(),
    };

    trace!(
        "{} fill: {} ring(s) -> {} op set(s), {} ops",
        fo.fill_style.name(),
        polygons.len(),
        sets.len(),
        sets.iter().map(|s| s.ops().len()).sum::<usize>()
    );
    sets
}

/// Widen pattern spacing so rows times pieces per row stays under
/// [`MAX_PIECES`] for this polygon set.
///
/// Rows are already capped by the scanline sweep; this bounds the teeth of
/// `zigzag-line` and the dashes of `dashed` along each row.
fn within_budget(mut fo: ResolvedOptions, polygons: &[Vec<Point>]) -> ResolvedOptions {
    let Some(b) = Bounds::of_points(polygons.iter().flatten()) else {
        return fo;
    };
    let diagonal = b.width().hypot(b.height());
    let row_gap = fo.hachure_gap.max(diagonal / scanline::MAX_ROWS as f64);
    let piece = (diagonal / MAX_PIECES) * (diagonal / row_gap);
    if !(piece > 0.0) {
        return fo;
    }

    if 2.0 * fo.zigzag_offset < piece {
        warn!("zigzag offset {:e} too fine for the fill area, widening to {:e}", fo.zigzag_offset, piece / 2.0);
        fo.zigzag_offset = piece / 2.0;
    }
    let period = fo.dash_offset + fo.dash_gap;
    if period < piece {
        let k = piece / period;
        warn!("dash period {period:e} too fine for the fill area, widening to {piece:e}");
        fo.dash_offset *= k;
        fo.dash_gap *= k;
    }
    fo
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    fn fill(style: FillStyle, polygons: &[Vec<Point>]) -> Vec<OpSet> {
        let o = Options::new().with_fill("red").with_fill_style(style).resolve().unwrap();
        fill_polygons(polygons, &o, &mut RandomSource::new(5).unwrap())
    }

    #[test]
    fn prepare_drops_closing_point() {
        let mut ring = square(0.0, 0.0, 10.0);
        ring.push(Point::new(0.0, 0.0));
        let prepared = prepare(&[ring], "polygon").unwrap();
        assert_eq!(prepared[0].len(), 4);
    }

    #[test]
    fn prepare_rejects_collinear_set() {
        let line = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        let err = prepare(&[line], "polygon").unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { shape: "polygon", .. }));
    }

    #[test]
    fn prepare_rejects_collinear_far_from_origin() {
        let line: Vec<Point> = (0..4)
            .map(|k| Point::new(1e6 + 0.1 * k as f64, 1e6 + 0.3 * k as f64))
            .collect();
        assert!(prepare(&[line], "polygon").is_err());
    }

    #[test]
    fn prepare_keeps_tiny_triangle() {
        let tri = vec![Point::new(0.0, 0.0), Point::new(1e-5, 0.0), Point::new(0.0, 1e-5)];
        assert_eq!(prepare(&[tri], "polygon").unwrap().len(), 1);
    }

    #[test]
    fn relative_area_ignores_scale_and_position() {
        let tri = |x: f64, s: f64| vec![Point::new(x, x), Point::new(x + s, x), Point::new(x, x + s)];
        assert!((relative_area(&tri(0.0, 1.0)) - 0.5).abs() < 1e-12);
        assert!((relative_area(&tri(1e6, 1e-3)) - 0.5).abs() < 1e-6);
        assert!((relative_area(&tri(0.0, 1e-5)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn budget_widens_tiny_zigzag_offset() {
        let o = Options { zigzag_offset: Some(1e-9), ..Options::new().with_fill("red") }.resolve().unwrap();
        let fo = within_budget(o.for_fill(), &[square(0.0, 0.0, 100.0)]);
        let rows = 100f64.hypot(100.0) / fo.hachure_gap;
        let teeth = 100f64.hypot(100.0) / (2.0 * fo.zigzag_offset);
        assert!(rows * teeth <= MAX_PIECES * 1.0001);
    }

    #[test]
    fn budget_leaves_ordinary_options_alone() {
        let o = Options::new().with_fill("red").resolve().unwrap();
        let fo = within_budget(o.for_fill(), &[square(0.0, 0.0, 100.0)]);
        assert_eq!(fo.zigzag_offset, o.zigzag_offset);
        assert_eq!(fo.dash_offset, o.dash_offset);
        assert_eq!(fo.dash_gap, o.dash_gap);
    }

    #[test]
    fn budget_widens_tiny_dashes_in_proportion() {
        let o = Options { dash_offset: Some(1e-9), dash_gap: Some(3e-9), ..Options::new().with_fill("red") }
            .resolve()
            .unwrap();
        let fo = within_budget(o.for_fill(), &[square(0.0, 0.0, 100.0)]);
        assert!(fo.dash_offset > 1e-9);
        assert!((fo.dash_gap / fo.dash_offset - 3.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_hachure_gap_still_finishes() {
        let o = Options::new()
            .with_fill("red")
            .with_hachure(1e-9, -41.0)
            .with_roughness(0.0)
            .single_stroke()
            .resolve()
            .unwrap();
        let sets = fill_polygons(&[square(0.0, 0.0, 10.0)], &o, &mut RandomSource::new(5).unwrap());
        let lines = sets[0].ops().iter().filter(|op| matches!(op, Op::Move(_))).count();
        assert!(lines <= scanline::MAX_ROWS + 1);
    }

    #[test]
    fn prepare_skips_degenerate_rings_but_keeps_good_ones() {
        let set = vec![vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)], square(0.0, 0.0, 10.0)];
        assert_eq!(prepare(&set, "path").unwrap().len(), 1);
    }

    #[test]
    fn prepare_rejects_non_finite() {
        let ring = vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0), Point::new(2.0, 0.0)];
        assert!(prepare(&[ring], "polygon").is_err());
    }

    #[test]
    fn cross_hatch_has_two_sets() {
        let sets = fill(FillStyle::CrossHatch, &[square(0.0, 0.0, 100.0)]);
        assert_eq!(sets.len(), 2);
        assert!(sets.iter().all(|s| s.kind() == OpSetKind::FillSketch));
    }

    #[test]
    fn every_style_produces_geometry() {
        for style in [
            FillStyle::Hachure,
            FillStyle::ZigZag,
            FillStyle::ZigZagLine,
            FillStyle::Dots,
            FillStyle::Dashed,
            FillStyle::Solid,
        ] {
            let sets = fill(style, &[square(0.0, 0.0, 100.0)]);
            assert_eq!(sets.len(), 1, "{style:?}");
            assert!(!sets[0].ops().is_empty(), "{style:?}");
        }
    }

    #[test]
    fn solid_is_a_fill_path() {
        let sets = fill(FillStyle::Solid, &[square(0.0, 0.0, 100.0)]);
        assert_eq!(sets[0].kind(), OpSetKind::FillPath);
    }

    #[test]
    fn tiny_shape_may_have_no_pattern() {
        // smaller than one hachure gap: the only scanline touches a corner
        let sets = fill(FillStyle::Dashed, &[square(0.0, 0.0, 0.5)]);
        assert!(sets.is_empty());
    }
}
