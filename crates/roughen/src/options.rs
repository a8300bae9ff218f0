//! Drawing options.
//!
//! Options come in two stages:
//! - [`Options`] is the sparse, user-facing layer. Every field is optional and
//!   the whole struct deserializes from camelCase JSON/YAML.
//! - [`ResolvedOptions`] is what the generators consume. Every field is set,
//!   every value has been checked, and it never changes after resolution.
//!
//! ## Rust Lesson #4: Option<T> as "not given"
//!
//! `Option<f64>` lets us tell "caller asked for 0" apart from "caller said
//! nothing". Layering is then just `layer.or(base)` per field.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gradient::parse_color;
use crate::rng::validate_seed;

/// Upper bound for `curveStepCount`.
pub const MAX_CURVE_STEPS: u32 = 10_000;

/// Upper bound for `gradientSmoothness`.
pub const MAX_GRADIENT_SMOOTHNESS: u32 = 256;

/// Smallest derived fill weight, used when the stroke is thin or absent.
const MIN_DEFAULT_FILL_WEIGHT: f64 = 0.5;

/// Pattern used to fill a closed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillStyle {
    #[default]
    #[serde(rename = "hachure")]
    Hachure,
    #[serde(rename = "cross-hatch")]
    CrossHatch,
    #[serde(rename = "zigzag")]
    ZigZag,
    #[serde(rename = "zigzag-line")]
    ZigZagLine,
    #[serde(rename = "dots")]
    Dots,
    #[serde(rename = "dashed")]
    Dashed,
    #[serde(rename = "solid")]
    Solid,
}

impl FillStyle {
    pub fn name(&self) -> &'static str {
        match self {
            FillStyle::Hachure => "hachure",
            FillStyle::CrossHatch => "cross-hatch",
            FillStyle::ZigZag => "zigzag",
            FillStyle::ZigZagLine => "zigzag-line",
            FillStyle::Dots => "dots",
            FillStyle::Dashed => "dashed",
            FillStyle::Solid => "solid",
        }
    }
}

/// A stroke or fill paint: one color, or several colors forming a gradient.
///
/// Colors are kept as the caller wrote them; gradient colors are parsed
/// during resolution so a bad color fails early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Color(String),
    Gradient(Vec<String>),
}

impl Paint {
    /// `"none"`, `"transparent"` and the empty string all mean "no paint".
    fn is_none(&self) -> bool {
        match self {
            Paint::Color(c) => {
                let c = c.trim();
                c.is_empty() || c.eq_ignore_ascii_case("none") || c.eq_ignore_ascii_case("transparent")
            }
            Paint::Gradient(_) => false,
        }
    }

    pub fn gradient_colors(&self) -> Option<&[String]> {
        match self {
            Paint::Gradient(colors) => Some(colors),
            Paint::Color(_) => None,
        }
    }
}

impl From<&str> for Paint {
    fn from(color: &str) -> Self {
        Paint::Color(color.to_string())
    }
}

impl From<Vec<&str>> for Paint {
    fn from(colors: Vec<&str>) -> Self {
        Paint::Gradient(colors.into_iter().map(str::to_string).collect())
    }
}

/// Sparse drawing options. Unset fields fall back to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    pub max_randomness_offset: Option<f64>,
    pub roughness: Option<f64>,
    pub bowing: Option<f64>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f64>,
    pub curve_fitting: Option<f64>,
    pub curve_tightness: Option<f64>,
    pub curve_step_count: Option<u32>,
    pub fill: Option<Paint>,
    pub fill_style: Option<FillStyle>,
    pub fill_weight: Option<f64>,
    pub hachure_angle: Option<f64>,
    pub hachure_gap: Option<f64>,
    pub dash_offset: Option<f64>,
    pub dash_gap: Option<f64>,
    pub zigzag_offset: Option<f64>,
    pub seed: Option<u32>,
    pub stroke_line_dash: Option<Vec<f64>>,
    pub stroke_line_dash_offset: Option<f64>,
    pub fill_line_dash: Option<Vec<f64>>,
    pub fill_line_dash_offset: Option<f64>,
    pub disable_multi_stroke: Option<bool>,
    pub disable_multi_stroke_fill: Option<bool>,
    pub preserve_vertices: Option<bool>,
    pub fill_shape_roughness_gain: Option<f64>,
    pub gradient_angle: Option<f64>,
    pub gradient_smoothness: Option<i32>,
    pub font_size: Option<f64>,
}

/// Fully populated, validated options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub max_randomness_offset: f64,
    pub roughness: f64,
    pub bowing: f64,
    /// `None` when the outline is not drawn.
    pub stroke: Option<Paint>,
    pub stroke_width: f64,
    pub curve_fitting: f64,
    pub curve_tightness: f64,
    pub curve_step_count: u32,
    /// `None` when the shape is not filled.
    pub fill: Option<Paint>,
    pub fill_style: FillStyle,
    pub fill_weight: f64,
    pub hachure_angle: f64,
    pub hachure_gap: f64,
    pub dash_offset: f64,
    pub dash_gap: f64,
    pub zigzag_offset: f64,
    pub seed: Option<u32>,
    pub stroke_line_dash: Vec<f64>,
    pub stroke_line_dash_offset: f64,
    pub fill_line_dash: Vec<f64>,
    pub fill_line_dash_offset: f64,
    pub disable_multi_stroke: bool,
    pub disable_multi_stroke_fill: bool,
    pub preserve_vertices: bool,
    pub fill_shape_roughness_gain: f64,
    pub gradient_angle: f64,
    pub gradient_smoothness: u32,
    pub font_size: f64,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = Some(roughness);
        self
    }

    pub fn with_bowing(mut self, bowing: f64) -> Self {
        self.bowing = Some(bowing);
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<Paint>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_fill_style(mut self, style: FillStyle) -> Self {
        self.fill_style = Some(style);
        self
    }

    pub fn with_hachure(mut self, gap: f64, angle_degrees: f64) -> Self {
        self.hachure_gap = Some(gap);
        self.hachure_angle = Some(angle_degrees);
        self
    }

    pub fn with_fill_weight(mut self, weight: f64) -> Self {
        self.fill_weight = Some(weight);
        self
    }

    /// Draw every stroke and fill line once instead of twice.
    pub fn single_stroke(mut self) -> Self {
        self.disable_multi_stroke = Some(true);
        self.disable_multi_stroke_fill = Some(true);
        self
    }

    pub fn with_preserve_vertices(mut self, preserve: bool) -> Self {
        self.preserve_vertices = Some(preserve);
        self
    }

    pub fn with_gradient(mut self, angle_degrees: f64, smoothness: i32) -> Self {
        self.gradient_angle = Some(angle_degrees);
        self.gradient_smoothness = Some(smoothness);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Layer `top` over `self`: fields set in `top` win.
    pub fn overlay(&self, top: &Options) -> Options {
        macro_rules! pick {
            ($($field:ident),* $(,)?) => {
                Options { $($field: top.$field.clone().or_else(|| self.$field.clone()),)* }
            };
        }
        pick!(
            max_randomness_offset,
            roughness,
            bowing,
            stroke,
            stroke_width,
            curve_fitting,
            curve_tightness,
            curve_step_count,
            fill,
            fill_style,
            fill_weight,
            hachure_angle,
            hachure_gap,
            dash_offset,
            dash_gap,
            zigzag_offset,
            seed,
            stroke_line_dash,
            stroke_line_dash_offset,
            fill_line_dash,
            fill_line_dash_offset,
            disable_multi_stroke,
            disable_multi_stroke_fill,
            preserve_vertices,
            fill_shape_roughness_gain,
            gradient_angle,
            gradient_smoothness,
            font_size,
        )
    }

    /// Fill every unset field with its default and validate the result.
    ///
    /// This is a pure function of `self`; it never draws randomness.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        let stroke_width = non_negative("strokeWidth", self.stroke_width.unwrap_or(2.0))?;
        let hachure_gap = positive("hachureGap", self.hachure_gap.unwrap_or(3.5))?;

        let stroke = self
            .stroke
            .clone()
            .unwrap_or_else(|| Paint::Color("#000".to_string()));
        let stroke = (!stroke.is_none() && stroke_width > 0.0).then_some(stroke);
        let fill = self.fill.clone().filter(|f| !f.is_none());

        if stroke.is_none() && fill.is_none() {
            return Err(Error::option("stroke", "shape has neither a stroke nor a fill"));
        }
        for paint in stroke.iter().chain(fill.iter()) {
            check_paint(paint)?;
        }

        let curve_fitting = self.curve_fitting.unwrap_or(0.95);
        if !(0.0..=1.0).contains(&curve_fitting) {
            return Err(Error::option("curveFitting", format!("{curve_fitting} is outside [0, 1]")));
        }

        let curve_step_count = self.curve_step_count.unwrap_or(9);
        if !(1..=MAX_CURVE_STEPS).contains(&curve_step_count) {
            return Err(Error::option(
                "curveStepCount",
                format!("{curve_step_count} is outside [1, {MAX_CURVE_STEPS}]"),
            ));
        }

        let gradient_smoothness = self.gradient_smoothness.unwrap_or(1);
        let gradient_smoothness = u32::try_from(gradient_smoothness)
            .ok()
            .filter(|s| *s <= MAX_GRADIENT_SMOOTHNESS)
            .ok_or_else(|| {
                Error::option(
                    "gradientSmoothness",
                    format!("{gradient_smoothness} is outside [0, {MAX_GRADIENT_SMOOTHNESS}]"),
                )
            })?;

        if let Some(seed) = self.seed {
            validate_seed(seed)?;
        }

        let stroke_line_dash = dashes("strokeLineDash", self.stroke_line_dash.as_deref())?;
        let fill_line_dash = dashes("fillLineDash", self.fill_line_dash.as_deref())?;

        Ok(ResolvedOptions {
            max_randomness_offset: non_negative(
                "maxRandomnessOffset",
                self.max_randomness_offset.unwrap_or(2.0),
            )?,
            roughness: non_negative("roughness", self.roughness.unwrap_or(1.0))?,
            bowing: finite("bowing", self.bowing.unwrap_or(2.0))?,
            stroke,
            stroke_width,
            curve_fitting,
            curve_tightness: finite("curveTightness", self.curve_tightness.unwrap_or(0.1))?,
            curve_step_count,
            fill,
            fill_style: self.fill_style.unwrap_or_default(),
            fill_weight: non_negative(
                "fillWeight",
                self.fill_weight.unwrap_or((stroke_width / 2.0).max(MIN_DEFAULT_FILL_WEIGHT)),
            )?,
            hachure_angle: finite("hachureAngle", self.hachure_angle.unwrap_or(-41.0))?,
            hachure_gap,
            dash_offset: positive("dashOffset", self.dash_offset.unwrap_or(hachure_gap))?,
            dash_gap: positive("dashGap", self.dash_gap.unwrap_or(hachure_gap))?,
            zigzag_offset: positive("zigzagOffset", self.zigzag_offset.unwrap_or(hachure_gap))?,
            seed: self.seed,
            stroke_line_dash,
            stroke_line_dash_offset: finite(
                "strokeLineDashOffset",
                self.stroke_line_dash_offset.unwrap_or(0.0),
            )?,
            fill_line_dash,
            fill_line_dash_offset: finite(
                "fillLineDashOffset",
                self.fill_line_dash_offset.unwrap_or(0.0),
            )?,
            disable_multi_stroke: self.disable_multi_stroke.unwrap_or(false),
            disable_multi_stroke_fill: self.disable_multi_stroke_fill.unwrap_or(false),
            preserve_vertices: self.preserve_vertices.unwrap_or(false),
            fill_shape_roughness_gain: non_negative(
                "fillShapeRoughnessGain",
                self.fill_shape_roughness_gain.unwrap_or(0.8),
            )?,
            gradient_angle: finite("gradientAngle", self.gradient_angle.unwrap_or(0.0))?,
            gradient_smoothness,
            font_size: positive("fontSize", self.font_size.unwrap_or(25.0))?,
        })
    }
}

impl ResolvedOptions {
    /// Options used for pattern fill strokes.
    ///
    /// Fill lines are drawn with the fill weight, a scaled roughness, and their
    /// own multi-stroke switch.
    pub(crate) fn for_fill(&self) -> ResolvedOptions {
        let mut o = self.clone();
        o.roughness = self.roughness * self.fill_shape_roughness_gain;
        o.disable_multi_stroke = self.disable_multi_stroke_fill;
        o.stroke_width = self.fill_weight;
        o
    }

    #[inline]
    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    #[inline]
    pub fn has_fill(&self) -> bool {
        self.fill.is_some()
    }
}

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

fn finite(field: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::option(field, format!("{v} is not a finite number")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<f64> {
    let v = finite(field, v)?;
    if v < 0.0 {
        return Err(Error::option(field, format!("{v} is negative")));
    }
    Ok(v)
}

fn positive(field: &'static str, v: f64) -> Result<f64> {
    let v = finite(field, v)?;
    if v <= 0.0 {
        return Err(Error::option(field, format!("{v} must be greater than zero")));
    }
    Ok(v)
}

fn dashes(field: &'static str, dash: Option<&[f64]>) -> Result<Vec<f64>> {
    let dash = dash.unwrap_or_default();
    for &d in dash {
        non_negative(field, d)?;
    }
    Ok(dash.to_vec())
}

fn check_paint(paint: &Paint) -> Result<()> {
    let Some(colors) = paint.gradient_colors() else {
        return Ok(());
    };
    if colors.len() < 2 {
        return Err(Error::option(
            "gradient",
            format!("a gradient needs at least two colors, got {}", colors.len()),
        ));
    }
    for color in colors {
        parse_color(color)?;
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
