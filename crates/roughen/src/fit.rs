//! Export-time auto-fit: scale and centre finished drawables into a viewport.
//!
//! The fitter only ever works on copies. Source drawables keep their
//! geometry, so fitting the same set to several sizes gives independent
//! results and fitting twice to the same size changes nothing.
//!
//! ## Algorithm
//!
//! 1. Bounding box over every point of every op set, control points included.
//! 2. If that box already lies inside the margins, use the identity.
//! 3. Otherwise scale uniformly by the tighter of the two axis ratios and
//!    centre the scaled box inside the margins.

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::Bounds;
use crate::ops::Drawable;
use crate::transform::Affine;

/// Slack when deciding whether geometry already fits.
const FIT_TOLERANCE: f64 = 1e-9;

/// Extents at or below this count as zero.
const MIN_EXTENT: f64 = 1e-12;

/// The result of fitting: the transform used and the transformed copies.
#[derive(Debug, Clone)]
pub struct Fitted {
    pub transform: Affine,
    pub drawables: Vec<Drawable>,
}

impl Fitted {
    /// Bounding box of the fitted geometry, `None` when there is none.
    pub fn bounds(&self) -> Option<Bounds> {
        combined_bounds(&self.drawables)
    }
}

/// Bounding box over every drawable.
pub fn combined_bounds(drawables: &[Drawable]) -> Option<Bounds> {
    let mut b = Bounds::EMPTY;
    drawables.iter().flat_map(Drawable::points).for_each(|p| b.include(p));
    (!b.is_empty()).then_some(b)
}

/// Transform that maps `bounds` into `width x height` minus `margin` on every
/// side.
pub fn fit_transform(bounds: Option<&Bounds>, width: f64, height: f64, margin: f64) -> Result<Affine> {
    if ![width, height, margin].iter().all(|v| v.is_finite()) {
        return Err(Error::option("fit", "width, height and margin must be finite"));
    }
    let avail_w = width - 2.0 * margin;
    let avail_h = height - 2.0 * margin;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return Err(Error::option(
            "fit",
            format!("no room inside {width}x{height} with margin {margin}"),
        ));
    }

    let Some(b) = bounds else {
        return Ok(Affine::IDENTITY);
    };
    let target = Bounds { min_x: margin, min_y: margin, max_x: width - margin, max_y: height - margin };
    if target.contains_bounds(b, FIT_TOLERANCE) {
        return Ok(Affine::IDENTITY);
    }

    let (box_w, box_h) = (b.width(), b.height());
    let scale = match (box_w > MIN_EXTENT, box_h > MIN_EXTENT) {
        (true, true) => (avail_w / box_w).min(avail_h / box_h),
        (true, false) => avail_w / box_w,
        (false, true) => avail_h / box_h,
        // a single point (or a stack of them): nothing to scale
        (false, false) => return Ok(Affine::IDENTITY),
    };

    let cx = (b.min_x + b.max_x) / 2.0;
    let cy = (b.min_y + b.max_y) / 2.0;
    let transform = Affine::translation(margin + avail_w / 2.0, margin + avail_h / 2.0)
        .then_local(&Affine::scaling(scale, scale))
        .then_local(&Affine::translation(-cx, -cy));
    Ok(transform)
}

/// Fit copies of `drawables` into the viewport.
pub fn fit(drawables: &[Drawable], width: f64, height: f64, margin: f64) -> Result<Fitted> {
    let bounds = combined_bounds(drawables);
    let transform = fit_transform(bounds.as_ref(), width, height, margin)?;

    debug!(
        "fit {} drawable(s) into {width}x{height} (margin {margin}): {}",
        drawables.len(),
        if transform.is_identity() { "identity".to_string() } else { format!("{:?}", transform.to_coefficients()) }
    );

    let drawables = if transform.is_identity() {
        drawables.to_vec()
    } else {
        drawables.iter().map(|d| d.transformed(&transform)).collect()
    };
    Ok(Fitted { transform, drawables })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bounds {
        Bounds { min_x, min_y, max_x, max_y }
    }

    #[test]
    fn inside_is_identity() {
        let t = fit_transform(Some(&b(20.0, 20.0, 80.0, 80.0)), 100.0, 100.0, 10.0).unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn no_geometry_is_identity() {
        assert!(fit_transform(None, 100.0, 100.0, 10.0).unwrap().is_identity());
    }

    #[test]
    fn single_point_is_identity() {
        let t = fit_transform(Some(&b(500.0, 500.0, 500.0, 500.0)), 100.0, 100.0, 0.0).unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn scales_down_and_centres() {
        let t = fit_transform(Some(&b(0.0, 0.0, 400.0, 200.0)), 100.0, 100.0, 10.0).unwrap();
        let [a, _, _, d, _, _] = t.to_coefficients();
        assert!((a - 0.2).abs() < 1e-12);
        assert!((a - d).abs() < 1e-12);

        let lo = t.apply(crate::geometry::Point::new(0.0, 0.0));
        let hi = t.apply(crate::geometry::Point::new(400.0, 200.0));
        assert!((lo.x - 10.0).abs() < 1e-9 && (hi.x - 90.0).abs() < 1e-9);
        // 40 tall, centred in 80
        assert!((lo.y - 30.0).abs() < 1e-9 && (hi.y - 70.0).abs() < 1e-9);
    }

    #[test]
    fn flat_box_uses_the_finite_ratio() {
        let t = fit_transform(Some(&b(0.0, 5.0, 1000.0, 5.0)), 100.0, 100.0, 0.0).unwrap();
        let [a, _, _, d, _, _] = t.to_coefficients();
        assert!((a - 0.1).abs() < 1e-12 && (d - 0.1).abs() < 1e-12);
    }

    #[test]
    fn no_room_is_an_error() {
        let err = fit_transform(None, 10.0, 100.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { field: "fit", .. }));
    }
}
