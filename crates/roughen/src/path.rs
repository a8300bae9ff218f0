//! Path segments, path-data parsing, and fill-polygon flattening.
//!
//! The sketcher only understands a small absolute segment set
//! ([`PathSegment`]). Parsing a path-data string into it is a collaborator's
//! job behind the [`PathParser`] trait; [`SvgPathParser`] is the stock adapter
//! over `svgtypes`, which already resolves relative commands, shorthands and
//! elliptical arcs.
//!
//! ## Curve Flattening
//!
//! Pattern fills need polygons, so cubic and quadratic segments are
//! "flattened" into line segments with lyon_geom at a fixed tolerance.

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// One absolute path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    QuadTo { ctrl: Point, to: Point },
    Close,
}

impl PathSegment {
    fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (pts, n) = match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => ([p, p, p], 1),
            PathSegment::CubicTo { c1, c2, to } => ([c1, c2, to], 3),
            PathSegment::QuadTo { ctrl, to } => ([ctrl, to, to], 2),
            PathSegment::Close => ([Point::default(); 3], 0),
        };
        pts.into_iter().take(n)
    }
}

/// Turns a path-data string into absolute segments.
pub trait PathParser {
    fn parse(&self, data: &str) -> Result<Vec<PathSegment>>;
}

/// [`PathParser`] for SVG path data (`M10 10 h 80 v 80 Z`, arcs included).
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgPathParser;

impl PathParser for SvgPathParser {
    fn parse(&self, data: &str) -> Result<Vec<PathSegment>> {
        let mut segments = Vec::new();
        for seg in SimplifyingPathParser::from(data) {
            let seg = seg.map_err(|e| Error::PathData(e.to_string()))?;
            segments.push(match seg {
                SimplePathSegment::MoveTo { x, y } => PathSegment::MoveTo(Point::new(x, y)),
                SimplePathSegment::LineTo { x, y } => PathSegment::LineTo(Point::new(x, y)),
                SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => PathSegment::CubicTo {
                    c1: Point::new(x1, y1),
                    c2: Point::new(x2, y2),
                    to: Point::new(x, y),
                },
                SimplePathSegment::Quadratic { x1, y1, x, y } => PathSegment::QuadTo {
                    ctrl: Point::new(x1, y1),
                    to: Point::new(x, y),
                },
                SimplePathSegment::ClosePath => PathSegment::Close,
            });
        }
        Ok(segments)
    }
}

/// Check that segments form a drawable path.
pub(crate) fn validate(segments: &[PathSegment]) -> Result<()> {
    match segments.first() {
        None => return Err(Error::geometry("path", "no segments")),
        Some(PathSegment::MoveTo(_)) => {}
        Some(_) => return Err(Error::geometry("path", "must begin with a move")),
    }
    if !segments.iter().flat_map(PathSegment::points).all(|p| p.is_finite()) {
        return Err(Error::geometry("path", "non-finite coordinate"));
    }
    Ok(())
}

/// Tolerance for curve flattening, in output units.
const CURVE_TOLERANCE: f64 = 0.1;

/// Flatten a path into one closed ring per sub-path.
///
/// Curves are approximated with line segments; consecutive duplicates are
/// removed so degenerate rings can be spotted by the fill engine.
pub fn flatten(segments: &[PathSegment]) -> Vec<Vec<Point>> {
    let mut rings = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut last = Point::default();

    for seg in segments {
        match *seg {
            PathSegment::MoveTo(p) => {
                if !ring.is_empty() {
                    rings.push(std::mem::take(&mut ring));
                }
                ring.push(p);
                last = p;
            }
            PathSegment::LineTo(p) => {
                ring.push(p);
                last = p;
            }
            PathSegment::CubicTo { c1, c2, to } => {
                let curve = CubicBezierSegment {
                    from: point(last.x, last.y),
                    ctrl1: point(c1.x, c1.y),
                    ctrl2: point(c2.x, c2.y),
                    to: point(to.x, to.y),
                };
                curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                    ring.push(Point::new(segment.to.x, segment.to.y));
                });
                last = to;
            }
            PathSegment::QuadTo { ctrl, to } => {
                let curve = QuadraticBezierSegment {
                    from: point(last.x, last.y),
                    ctrl: point(ctrl.x, ctrl.y),
                    to: point(to.x, to.y),
                };
                curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                    ring.push(Point::new(segment.to.x, segment.to.y));
                });
                last = to;
            }
            PathSegment::Close => {
                // the next drawing command restarts at the ring's first point
                if let Some(&first) = ring.first() {
                    last = first;
                }
            }
        }
    }
    if !ring.is_empty() {
        rings.push(ring);
    }

    for ring in &mut rings {
        ring.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }
    rings
}
