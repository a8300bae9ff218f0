//! # roughen
//!
//! Hand-drawn sketch geometry. Clean shapes go in (lines, rectangles,
//! ellipses, arcs, curves, polygons, paths, text outlines) and come out as
//! jittered strokes plus patterned interior fills, reproducible under a seed.
//!
//! The crate produces geometry only: [`Drawable`]s made of path ops. Turning
//! them into SVG, PDF or pixels is up to the caller.
//!
//! ## Layout
//!
//! - [`generator`] is the entry point: it owns defaults, the seed, and the
//!   transform stack, and turns each call into one [`Drawable`].
//! - [`sketch`] jitters outlines; [`fill`] lays patterns inside polygon sets,
//!   with [`clip`] deciding what counts as inside.
//! - [`options`], [`rng`], [`transform`] and [`gradient`] hold the per-call
//!   state those two consume.
//! - [`fit`] and [`text`] sit on either side: one rescales finished drawables,
//!   the other feeds glyph outlines in.

pub mod clip;
pub mod error;
pub mod fill;
pub mod fit;
pub mod generator;
pub mod geometry;
pub mod gradient;
pub mod ops;
pub mod options;
pub mod path;
pub mod rng;
pub mod sketch;
pub mod text;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use error::{Error, Result};
pub use fit::{Fitted, fit};
pub use generator::Generator;
pub use geometry::{Bounds, Line, Point};
pub use gradient::{GradientSpec, GradientStop, build_gradient};
pub use ops::{Drawable, Op, OpSet, OpSetKind, ShapeKind};
pub use options::{FillStyle, Options, Paint, ResolvedOptions};
pub use path::{PathParser, PathSegment, SvgPathParser};
pub use rng::{RandomSource, new_seed};
pub use text::{GlyphOutliner, TextAlign, TextAlignment, VerticalAlign};
pub use transform::{Affine, TransformStack};
