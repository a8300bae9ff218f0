//! The generation context: one method per primitive.
//!
//! A [`Generator`] owns everything that persists between shape calls:
//! - the default [`Options`] every call is layered over
//! - the [`RandomSource`] that calls without their own seed draw from
//! - the [`TransformStack`] baked into each new drawable
//! - an optional [`GlyphOutliner`] for text
//!
//! ## Call Flow
//!
//! Each shape call resolves its options, validates its geometry and fill
//! polygons, then sketches strokes, then fills, then applies the current
//! transform and attaches gradients. All checks run before the first random
//! draw. Drawing happens on a copy of the random source that is committed
//! only when the call succeeds, so a failed call leaves the context as it was.
//!
//! A call whose options carry a `seed` gets its own source started from that
//! seed and never touches the context's source: the same call with the same
//! seed reproduces exactly, wherever it sits in the drawing order.
//!
//! ## Rust Lesson #12: `&mut self` as a Single Writer
//!
//! Every shape method takes `&mut self`. Two shape calls on one context can
//! never overlap, so the random sequence is consumed in one fixed order.
//! Separate generators share nothing and can live on separate threads.

use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::fill::{fill_polygons, prepare};
use crate::geometry::{Bounds, Point};
use crate::gradient::{GradientSpec, build_gradient};
use crate::ops::{Drawable, Op, OpSet, OpSetKind, ShapeKind};
use crate::options::{Options, ResolvedOptions};
use crate::path::{self, PathParser, PathSegment};
use crate::rng::{self, RandomSource};
use crate::sketch;
use crate::text::{self, GlyphOutliner, TextAlignment};
use crate::transform::{Affine, TransformStack};

/// A sketch generation context.
///
/// # Example
/// ```
/// use roughen::{Generator, Options, OpSetKind};
///
/// let mut g = Generator::new(Options::new().with_seed(42)).unwrap();
/// let square = g.rectangle(10.0, 10.0, 80.0, 80.0, &Options::new().with_fill("red")).unwrap();
///
/// // outline first, then the hachure
/// assert_eq!(square.sets()[0].kind(), OpSetKind::Stroke);
/// assert_eq!(square.sets().last().unwrap().kind(), OpSetKind::FillSketch);
/// ```
pub struct Generator {
    defaults: Options,
    rng: RandomSource,
    transform: TransformStack,
    outliner: Option<Box<dyn GlyphOutliner + Send + Sync>>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("defaults", &self.defaults)
            .field("rng", &self.rng)
            .field("transform", &self.transform)
            .field("outliner", &self.outliner.is_some())
            .finish()
    }
}

impl Generator {
    /// Create a context over `defaults`.
    ///
    /// With `defaults.seed` set the context is reproducible; without it the
    /// context draws its seed from entropy (see [`Generator::seed`]).
    pub fn new(defaults: Options) -> Result<Self> {
        defaults.resolve()?;
        let rng = match defaults.seed {
            Some(seed) => RandomSource::new(seed)?,
            None => RandomSource::from_entropy(),
        };
        debug!(
            "generator: seed {} ({})",
            rng.seed(),
            if rng.is_reproducible() { "explicit" } else { "entropy" }
        );
        Ok(Self { defaults, rng, transform: TransformStack::new(), outliner: None })
    }

    /// Install the glyph outliner used by [`Generator::text`].
    pub fn with_outliner(mut self, outliner: impl GlyphOutliner + Send + Sync + 'static) -> Self {
        self.outliner = Some(Box::new(outliner));
        self
    }

    /// A fresh seed, for callers who want to record and replay one.
    pub fn new_seed() -> u32 {
        rng::new_seed()
    }

    /// The seed the context's random source started from.
    ///
    /// Entropy-mode contexts report their drawn seed too; replaying it with
    /// [`Generator::reseed`] reproduces the sequence.
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn is_reproducible(&self) -> bool {
        self.rng.is_reproducible()
    }

    /// Restart the context's random source from `seed`.
    pub fn reseed(&mut self, seed: u32) -> Result<()> {
        self.rng = RandomSource::new(seed)?;
        Ok(())
    }

    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    // ========================================================================
    // TRANSFORMS
    // ========================================================================

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    /// Rotate by `theta` radians about the current local origin.
    pub fn rotate(&mut self, theta: f64) {
        self.transform.rotate(theta);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform.scale(sx, sy);
    }

    pub fn reset_transform(&mut self) {
        self.transform.reset();
    }

    /// The transform new drawables are created with.
    pub fn transform(&self) -> &Affine {
        self.transform.current()
    }

    // ========================================================================
    // PRIMITIVES
    // ========================================================================

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        check_finite("line", &[x1, y1, x2, y2])?;
        require_stroke("line", &o)?;
        let (p1, p2) = (Point::new(x1, y1), Point::new(x2, y2));

        self.generate(ShapeKind::Line, o, |o, rng| {
            Ok(stroke(sketch::double_line(p1, p2, o, rng)).into_iter().collect())
        })
    }

    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        check_finite("rectangle", &[x, y, width, height])?;
        if width == 0.0 || height == 0.0 {
            return Err(Error::geometry("rectangle", format!("zero size {width}x{height}")));
        }
        let fill = fill_set(&o, "rectangle", &[sketch::rectangle_points(x, y, width, height)])?;

        self.generate(ShapeKind::Rectangle, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                sets.extend(stroke(sketch::rectangle(x, y, width, height, o, rng)));
            }
            if let Some(polygons) = fill {
                sets.extend(fill_polygons(&polygons, o, rng));
            }
            Ok(sets)
        })
    }

    /// Ellipse centred on `(x, y)` with the given full width and height.
    pub fn ellipse(&mut self, x: f64, y: f64, width: f64, height: f64, options: &Options) -> Result<Drawable> {
        self.ellipse_shape(ShapeKind::Ellipse, x, y, width, height, options)
    }

    pub fn circle(&mut self, x: f64, y: f64, diameter: f64, options: &Options) -> Result<Drawable> {
        self.ellipse_shape(ShapeKind::Circle, x, y, diameter, diameter, options)
    }

    fn ellipse_shape(
        &mut self,
        shape: ShapeKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: &Options,
    ) -> Result<Drawable> {
        let name = shape_name(shape);
        let o = self.resolve(options)?;
        check_finite(name, &[x, y, width, height])?;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::geometry(name, format!("size {width}x{height} must be positive")));
        }
        let center = Point::new(x, y);

        self.generate(shape, o, |o, rng| {
            let ep = sketch::ellipse_params(width, height, o, rng);
            let (ops, core) = sketch::ellipse_with_params(center, &ep, o, rng);
            let mut sets = Vec::new();
            if o.has_stroke() {
                sets.extend(stroke(ops));
            }
            if o.has_fill() {
                sets.extend(fill_polygons(&prepare(&[core], name)?, o, rng));
            }
            Ok(sets)
        })
    }

    /// An open polyline. Never filled.
    pub fn linear_path(&mut self, points: &[Point], options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        check_points("linear path", points, 2)?;
        require_stroke("linear path", &o)?;

        self.generate(ShapeKind::LinearPath, o, |o, rng| {
            Ok(stroke(sketch::linear_path(points, false, o, rng)).into_iter().collect())
        })
    }

    pub fn polygon(&mut self, points: &[Point], options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        check_points("polygon", points, 2)?;
        let fill = fill_set(&o, "polygon", &[points.to_vec()])?;

        self.generate(ShapeKind::Polygon, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                sets.extend(stroke(sketch::polygon(points, o, rng)));
            }
            if let Some(polygons) = fill {
                sets.extend(fill_polygons(&polygons, o, rng));
            }
            Ok(sets)
        })
    }

    /// Elliptical arc from `start` to `stop` radians (clockwise on screen).
    ///
    /// `closed` adds the two radii, forming a wedge; only closed arcs are
    /// filled.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        start: f64,
        stop: f64,
        closed: bool,
        options: &Options,
    ) -> Result<Drawable> {
        let o = self.resolve(options)?;
        check_finite("arc", &[x, y, width, height, start, stop])?;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::geometry("arc", format!("size {width}x{height} must be positive")));
        }
        if stop <= start {
            return Err(Error::geometry("arc", format!("stop angle {stop} is not after start {start}")));
        }
        if !closed {
            require_stroke("arc", &o)?;
        }
        let center = Point::new(x, y);

        self.generate(ShapeKind::Arc, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                sets.extend(stroke(sketch::arc(center, width, height, start, stop, closed, o, rng)));
            }
            if closed && o.has_fill() {
                let polygon = sketch::arc_fill_polygon(center, width, height, start, stop, o, rng);
                sets.extend(fill_polygons(&prepare(&[polygon], "arc")?, o, rng));
            }
            Ok(sets)
        })
    }

    /// Smooth curves through one or more point lists, one stroke op set each.
    ///
    /// Filled curves are closed back to their first point.
    pub fn curve(&mut self, lists: &[Vec<Point>], options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        if lists.is_empty() {
            return Err(Error::geometry("curve", "no point lists"));
        }
        for points in lists {
            check_points("curve", points, 2)?;
        }
        let outlines: Vec<Vec<Point>> = lists.iter().map(|l| curve_outline(l, o.curve_tightness)).collect();
        let fill = fill_set(&o, "curve", &outlines)?;

        self.generate(ShapeKind::Curve, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                for points in lists {
                    sets.extend(stroke(sketch::curve(points, o, rng)));
                }
            }
            if let Some(polygons) = fill {
                sets.extend(fill_polygons(&polygons, o, rng));
            }
            Ok(sets)
        })
    }

    /// Sketch pre-parsed path segments. Each sub-path is a fill polygon.
    pub fn path(&mut self, segments: &[PathSegment], options: &Options) -> Result<Drawable> {
        let o = self.resolve(options)?;
        path::validate(segments)?;
        let fill = fill_set(&o, "path", &path::flatten(segments))?;

        self.generate(ShapeKind::Path, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                sets.extend(stroke(sketch::path(segments, o, rng)));
            }
            if let Some(polygons) = fill {
                sets.extend(fill_polygons(&polygons, o, rng));
            }
            Ok(sets)
        })
    }

    /// Parse `data` with `parser`, then sketch it like [`Generator::path`].
    pub fn path_data(&mut self, data: &str, parser: &dyn PathParser, options: &Options) -> Result<Drawable> {
        let segments = parser.parse(data)?;
        self.path(&segments, options)
    }

    /// Sketch the glyph outlines of `text`, anchored at `(x, y)`.
    ///
    /// Needs an outliner from [`Generator::with_outliner`]. Every contour is
    /// stroked as a closed polygon; the fill treats all contours as one set,
    /// so counters stay empty.
    pub fn text(
        &mut self,
        content: &str,
        x: f64,
        y: f64,
        alignment: TextAlignment,
        options: &Options,
    ) -> Result<Drawable> {
        let Some(outliner) = self.outliner.as_deref() else {
            return Err(Error::UnavailableCapability("glyph outliner"));
        };
        let o = self.resolve(options)?;
        check_finite("text", &[x, y])?;
        let contours = text::layout(outliner, content, o.font_size, x, y, alignment)?;
        let fill = fill_set(&o, "text", &contours)?;

        self.generate(ShapeKind::Text, o, |o, rng| {
            let mut sets = Vec::new();
            if o.has_stroke() {
                for contour in &contours {
                    sets.extend(stroke(sketch::polygon(contour, o, rng)));
                }
            }
            if let Some(polygons) = fill {
                sets.extend(fill_polygons(&polygons, o, rng));
            }
            Ok(sets)
        })
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Layer a call's options over the defaults and resolve them.
    ///
    /// Only a seed given with the call itself makes the call self-seeded; the
    /// default seed belongs to the context's source.
    fn resolve(&self, call: &Options) -> Result<ResolvedOptions> {
        let mut merged = self.defaults.overlay(call);
        merged.seed = call.seed;
        merged.resolve()
    }

    fn generate(
        &mut self,
        shape: ShapeKind,
        o: ResolvedOptions,
        build: impl FnOnce(&ResolvedOptions, &mut RandomSource) -> Result<Vec<OpSet>>,
    ) -> Result<Drawable> {
        let mut rng = match o.seed {
            Some(seed) => RandomSource::new(seed)?,
            None => self.rng.clone(),
        };
        let sets = build(&o, &mut rng)?;

        let drawable = Drawable::new(shape, o, sets);
        let (stroke_gradient, fill_gradient) = gradients(&drawable)?;
        let drawable = drawable.with_gradients(stroke_gradient, fill_gradient);

        let affine = *self.transform.current();
        let drawable = if affine.is_identity() { drawable } else { drawable.transformed(&affine) };

        debug!(
            "{}: {} op set(s), {} ops, seed {}",
            shape_name(shape),
            drawable.sets().len(),
            drawable.sets().iter().map(|s| s.ops().len()).sum::<usize>(),
            rng.seed()
        );
        if drawable.options().seed.is_none() {
            self.rng = rng;
        }
        Ok(drawable)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn stroke(ops: Vec<Op>) -> Option<OpSet> {
    OpSet::new(OpSetKind::Stroke, ops)
}

fn shape_name(shape: ShapeKind) -> &'static str {
    match shape {
        ShapeKind::Line => "line",
        ShapeKind::Rectangle => "rectangle",
        ShapeKind::Ellipse => "ellipse",
        ShapeKind::Circle => "circle",
        ShapeKind::Arc => "arc",
        ShapeKind::Curve => "curve",
        ShapeKind::LinearPath => "linear path",
        ShapeKind::Polygon => "polygon",
        ShapeKind::Path => "path",
        ShapeKind::Text => "text",
    }
}

fn check_finite(shape: &'static str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::geometry(shape, "non-finite coordinate"))
    }
}

fn check_points(shape: &'static str, points: &[Point], min: usize) -> Result<()> {
    if points.len() < min {
        return Err(Error::geometry(shape, format!("needs at least {min} points, got {}", points.len())));
    }
    if !points.iter().all(Point::is_finite) {
        return Err(Error::geometry(shape, "non-finite coordinate"));
    }
    Ok(())
}

/// Shapes without an interior are only visible through their stroke.
fn require_stroke(shape: &'static str, o: &ResolvedOptions) -> Result<()> {
    if o.has_stroke() {
        Ok(())
    } else {
        Err(Error::option("stroke", format!("a {shape} cannot be filled and has no stroke")))
    }
}

/// Prepared fill polygons when the shape is filled.
fn fill_set(o: &ResolvedOptions, shape: &'static str, polygons: &[Vec<Point>]) -> Result<Option<Vec<Vec<Point>>>> {
    if o.has_fill() {
        prepare(polygons, shape).map(Some)
    } else {
        Ok(None)
    }
}

/// Exact Catmull-Rom outline through `points`, flattened to a polygon.
fn curve_outline(points: &[Point], tightness: f64) -> Vec<Point> {
    let s = 1.0 - tightness;
    let n = points.len();
    let at = |i: isize| points[i.clamp(0, n as isize - 1) as usize];

    let mut segments = vec![PathSegment::MoveTo(points[0])];
    for i in 0..n as isize - 1 {
        let (prev, cur, next, after) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        segments.push(PathSegment::CubicTo {
            c1: Point::new(cur.x + s * (next.x - prev.x) / 6.0, cur.y + s * (next.y - prev.y) / 6.0),
            c2: Point::new(next.x + s * (cur.x - after.x) / 6.0, next.y + s * (cur.y - after.y) / 6.0),
            to: next,
        });
    }
    path::flatten(&segments).into_iter().next().unwrap_or_default()
}

/// Gradients for multi-color paints, laid out over the drawable's box.
fn gradients(d: &Drawable) -> Result<(Option<GradientSpec>, Option<GradientSpec>)> {
    let o = d.options();
    let bounds = d.bounds().unwrap_or(Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 });
    let build = |colors: Option<&[String]>| {
        colors
            .map(|c| build_gradient(c, o.gradient_angle, o.gradient_smoothness, &bounds))
            .transpose()
    };
    let stroke = build(o.stroke.as_ref().and_then(|p| p.gradient_colors()))?;
    let fill = build(o.fill.as_ref().and_then(|p| p.gradient_colors()))?;
    Ok((stroke, fill))
}

// ============================================================================
// TESTS
// ============================================================================
