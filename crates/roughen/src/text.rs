//! Text as sketched glyph outlines.
//!
//! Fonts are not read here. A [`GlyphOutliner`] supplied by the caller turns
//! a string into glyph contours; this module flattens them into polygons and
//! places the result relative to an anchor point.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point};
use crate::path::{PathSegment, flatten};

/// Produces glyph outlines for a run of text.
///
/// Contours use absolute coordinates with the text origin on the baseline at
/// `(0, 0)` and y growing downward. Each `MoveTo` starts a new closed contour;
/// counters (the hole in "O") are ordinary contours and come out as holes
/// under the even-odd rule.
pub trait GlyphOutliner {
    fn outline(&self, text: &str, font_size: f64) -> Result<Vec<PathSegment>>;
}

/// Horizontal placement of the outline's box relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement relative to the anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// The anchor is the baseline; the outline is not shifted vertically.
    #[default]
    Baseline,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextAlignment {
    pub horizontal: TextAlign,
    pub vertical: VerticalAlign,
}

impl TextAlignment {
    pub fn new(horizontal: TextAlign, vertical: VerticalAlign) -> Self {
        Self { horizontal, vertical }
    }

    pub fn centered() -> Self {
        Self::new(TextAlign::Center, VerticalAlign::Middle)
    }

    /// Offset that moves an outline with box `b` to the anchor `(x, y)`.
    fn offset(&self, b: &Bounds, x: f64, y: f64) -> Point {
        let dx = match self.horizontal {
            TextAlign::Left => x - b.min_x,
            TextAlign::Center => x - (b.min_x + b.max_x) / 2.0,
            TextAlign::Right => x - b.max_x,
        };
        let dy = match self.vertical {
            VerticalAlign::Baseline => y,
            VerticalAlign::Top => y - b.min_y,
            VerticalAlign::Middle => y - (b.min_y + b.max_y) / 2.0,
            VerticalAlign::Bottom => y - b.max_y,
        };
        Point::new(dx, dy)
    }
}

/// Outline `text`, flatten it, and place it at the anchor.
///
/// Returns one closed polygon per contour.
pub fn layout(
    outliner: &dyn GlyphOutliner,
    text: &str,
    font_size: f64,
    x: f64,
    y: f64,
    alignment: TextAlignment,
) -> Result<Vec<Vec<Point>>> {
    let segments = outliner.outline(text, font_size)?;
    if segments.is_empty() {
        return Err(Error::geometry("text", format!("no glyph outlines for {text:?}")));
    }
    if !matches!(segments.first(), Some(PathSegment::MoveTo(_))) {
        return Err(Error::Outline("glyph outline does not start with a move".to_string()));
    }

    let contours: Vec<Vec<Point>> = flatten(&segments)
        .into_iter()
        .map(|mut ring| {
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            ring
        })
        .filter(|ring| ring.len() >= 2)
        .collect();
    if !contours.iter().flatten().all(Point::is_finite) {
        return Err(Error::Outline("glyph outline has a non-finite coordinate".to_string()));
    }

    let Some(bounds) = Bounds::of_points(contours.iter().flatten()) else {
        return Err(Error::geometry("text", format!("no glyph outlines for {text:?}")));
    };
    let d = alignment.offset(&bounds, x, y);

    Ok(contours
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| Point::new(p.x + d.x, p.y + d.y)).collect())
        .collect())
}
