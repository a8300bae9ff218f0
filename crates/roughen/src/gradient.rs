//! Linear gradient construction for multi-color paint.
//!
//! A gradient is laid out in the bounding-box frame of the shape it paints:
//! the axis starts at the frame origin and points along `gradientAngle`,
//! stretched to the box extents. Between each pair of caller colors,
//! `gradientSmoothness` interpolated stops are inserted so renderers without
//! good interpolation still blend smoothly.

use serde::Serialize;
use svgtypes::Color;

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point};
use crate::options::MAX_GRADIENT_SMOOTHNESS;
use crate::transform::Affine;

/// A color stop at `offset` in `[0, 1]` along the gradient axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// A linear gradient in a shape's bounding-box frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientSpec {
    /// Stops with strictly increasing offsets, first at 0 and last at 1.
    pub stops: Vec<GradientStop>,
    /// Axis start, relative to `origin`.
    pub start: Point,
    /// Axis end, relative to `origin`.
    pub end: Point,
    /// The frame origin: the top-left of the shape's bounding box.
    pub origin: Point,
}

impl GradientSpec {
    pub(crate) fn transformed(&self, affine: &Affine) -> GradientSpec {
        GradientSpec {
            stops: self.stops.clone(),
            start: affine.apply_vector(self.start),
            end: affine.apply_vector(self.end),
            origin: affine.apply(self.origin),
        }
    }
}

/// Parse a CSS color (named, hex, `rgb()`/`rgba()`, ...).
pub(crate) fn parse_color(color: &str) -> Result<Color> {
    color
        .trim()
        .parse::<Color>()
        .map_err(|e| Error::option("gradient", format!("cannot parse color `{color}`: {e}")))
}

/// Build a gradient over `bounds` from two or more colors.
pub fn build_gradient(
    colors: &[String],
    angle_degrees: f64,
    smoothness: u32,
    bounds: &Bounds,
) -> Result<GradientSpec> {
    if colors.len() < 2 {
        return Err(Error::option(
            "gradient",
            format!("a gradient needs at least two colors, got {}", colors.len()),
        ));
    }
    if smoothness > MAX_GRADIENT_SMOOTHNESS {
        return Err(Error::option(
            "gradientSmoothness",
            format!("{smoothness} is outside [0, {MAX_GRADIENT_SMOOTHNESS}]"),
        ));
    }
    let parsed = colors.iter().map(|c| parse_color(c)).collect::<Result<Vec<_>>>()?;

    let segments = (colors.len() - 1) as f64;
    let mut stops = Vec::with_capacity(colors.len() + (colors.len() - 1) * smoothness as usize);

    for (i, pair) in parsed.windows(2).enumerate() {
        stops.push(GradientStop { offset: i as f64 / segments, color: colors[i].clone() });
        for k in 1..=smoothness {
            let t = k as f64 / (smoothness + 1) as f64;
            stops.push(GradientStop {
                offset: (i as f64 + t) / segments,
                color: css(lerp_color(pair[0], pair[1], t)),
            });
        }
    }
    if let Some(last) = colors.last() {
        stops.push(GradientStop { offset: 1.0, color: last.clone() });
    }

    let w = if bounds.width() < 1e-9 { 1.0 } else { bounds.width() };
    let h = if bounds.height() < 1e-9 { 1.0 } else { bounds.height() };
    let a = angle_degrees.to_radians();

    Ok(GradientSpec {
        stops,
        start: Point::new(0.0, 0.0),
        end: Point::new(a.cos() * w, a.sin() * h),
        origin: Point::new(bounds.min_x, bounds.min_y),
    })
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
    Color::new_rgba(
        mix(a.red, b.red),
        mix(a.green, b.green),
        mix(a.blue, b.blue),
        mix(a.alpha, b.alpha),
    )
}

fn css(c: Color) -> String {
    if c.alpha == 255 {
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    } else {
        format!("rgba({}, {}, {}, {:.3})", c.red, c.green, c.blue, c.alpha as f64 / 255.0)
    }
}
