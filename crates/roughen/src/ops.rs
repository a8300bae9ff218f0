//! Output model: drawing ops, op sets, and drawables.
//!
//! A [`Drawable`] is the result of one shape call. It owns an ordered list of
//! [`OpSet`]s: outline strokes first, fills after. Each op set is a path
//! description a renderer can replay with the paint its [`OpSetKind`] names.

use serde::Serialize;

use crate::geometry::{Bounds, Point};
use crate::gradient::GradientSpec;
use crate::options::ResolvedOptions;
use crate::transform::Affine;

/// A single path command in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Op {
    Move(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

impl Op {
    /// Every point the op carries, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (pts, n) = match *self {
            Op::Move(p) | Op::LineTo(p) => ([p, p, p], 1),
            Op::CubicTo { c1, c2, to } => ([c1, c2, to], 3),
        };
        pts.into_iter().take(n)
    }

    /// The on-curve end point of the op.
    #[inline]
    pub fn end(&self) -> Point {
        match *self {
            Op::Move(p) | Op::LineTo(p) => p,
            Op::CubicTo { to, .. } => to,
        }
    }

    pub(crate) fn map(&self, f: impl Fn(Point) -> Point) -> Op {
        match *self {
            Op::Move(p) => Op::Move(f(p)),
            Op::LineTo(p) => Op::LineTo(f(p)),
            Op::CubicTo { c1, c2, to } => Op::CubicTo { c1: f(c1), c2: f(c2), to: f(to) },
        }
    }
}

/// How a renderer should paint an [`OpSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OpSetKind {
    /// Outline pass, stroked with the stroke paint.
    Stroke,
    /// Pattern fill lines, stroked at fill weight with the fill paint.
    FillSketch,
    /// Solid fill region, filled with the fill paint.
    FillPath,
}

/// A non-empty op sequence that always begins with [`Op::Move`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpSet {
    kind: OpSetKind,
    ops: Vec<Op>,
}

impl OpSet {
    /// Wrap `ops`, or `None` when they do not form a path.
    pub fn new(kind: OpSetKind, ops: Vec<Op>) -> Option<Self> {
        match ops.first() {
            Some(Op::Move(_)) => Some(Self { kind, ops }),
            _ => None,
        }
    }

    #[inline]
    pub fn kind(&self) -> OpSetKind {
        self.kind
    }

    #[inline]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// All points of all ops, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.ops.iter().flat_map(Op::points)
    }

    pub(crate) fn map_points(&self, f: impl Fn(Point) -> Point) -> OpSet {
        OpSet { kind: self.kind, ops: self.ops.iter().map(|op| op.map(&f)).collect() }
    }
}

/// Primitive a drawable was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Circle,
    Arc,
    Curve,
    LinearPath,
    Polygon,
    Path,
    Text,
}

/// The immutable result of one shape call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawable {
    shape: ShapeKind,
    options: ResolvedOptions,
    sets: Vec<OpSet>,
    link: Option<String>,
    stroke_gradient: Option<GradientSpec>,
    fill_gradient: Option<GradientSpec>,
}

impl Drawable {
    pub(crate) fn new(shape: ShapeKind, options: ResolvedOptions, sets: Vec<OpSet>) -> Self {
        Self { shape, options, sets, link: None, stroke_gradient: None, fill_gradient: None }
    }

    pub(crate) fn with_gradients(
        mut self,
        stroke: Option<GradientSpec>,
        fill: Option<GradientSpec>,
    ) -> Self {
        self.stroke_gradient = stroke;
        self.fill_gradient = fill;
        self
    }

    #[inline]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[inline]
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    #[inline]
    pub fn sets(&self) -> &[OpSet] {
        &self.sets
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn stroke_gradient(&self) -> Option<&GradientSpec> {
        self.stroke_gradient.as_ref()
    }

    pub fn fill_gradient(&self) -> Option<&GradientSpec> {
        self.fill_gradient.as_ref()
    }

    /// A copy wrapped in a hyperlink to `href`.
    pub fn linked(mut self, href: impl Into<String>) -> Self {
        self.link = Some(href.into());
        self
    }

    /// Op sets of one kind, in order.
    pub fn sets_of(&self, kind: OpSetKind) -> impl Iterator<Item = &OpSet> {
        self.sets.iter().filter(move |s| s.kind == kind)
    }

    /// Every emitted point, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.sets.iter().flat_map(OpSet::points)
    }

    /// Bounding box over every point, `None` for a drawable with no ops.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut b = Bounds::EMPTY;
        self.points().for_each(|p| b.include(p));
        (!b.is_empty()).then_some(b)
    }

    /// A copy with `affine` applied to all geometry, gradient frames included.
    pub(crate) fn transformed(&self, affine: &Affine) -> Drawable {
        Drawable {
            shape: self.shape,
            options: self.options.clone(),
            sets: self.sets.iter().map(|s| s.map_points(|p| affine.apply(p))).collect(),
            link: self.link.clone(),
            stroke_gradient: self.stroke_gradient.as_ref().map(|g| g.transformed(affine)),
            fill_gradient: self.fill_gradient.as_ref().map(|g| g.transformed(affine)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
