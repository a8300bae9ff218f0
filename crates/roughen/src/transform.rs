//! Affine transforms baked into generated geometry.
//!
//! A [`TransformStack`] holds one composed matrix. Each operation acts in the
//! current local frame (`current = current * op`), the way canvas transforms
//! compose, so `translate` then `rotate` spins shapes about the translated
//! origin.

use glam::{DAffine2, DVec2};

use crate::geometry::Point;

/// A 2D affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(DAffine2);

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine(DAffine2::IDENTITY);

    #[inline]
    pub fn translation(dx: f64, dy: f64) -> Self {
        Affine(DAffine2::from_translation(DVec2::new(dx, dy)))
    }

    /// Rotation by `theta` radians; positive maps +x toward +y.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        Affine(DAffine2::from_angle(theta))
    }

    #[inline]
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Affine(DAffine2::from_scale(DVec2::new(sx, sy)))
    }

    /// Compose so that `other` is applied to points first, then `self`.
    #[inline]
    pub fn then_local(&self, other: &Affine) -> Affine {
        Affine(self.0 * other.0)
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let v = self.0.transform_point2(DVec2::new(p.x, p.y));
        Point::new(v.x, v.y)
    }

    /// Apply the linear part only, ignoring translation.
    #[inline]
    pub fn apply_vector(&self, p: Point) -> Point {
        let v = self.0.transform_vector2(DVec2::new(p.x, p.y));
        Point::new(v.x, v.y)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0 == DAffine2::IDENTITY
    }

    /// Canvas-style coefficients `[a, b, c, d, e, f]`, mapping
    /// `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
    pub fn to_coefficients(&self) -> [f64; 6] {
        let m = self.0.matrix2;
        let t = self.0.translation;
        [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, t.x, t.y]
    }
}

/// The current composed transform of a generation context.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Affine,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &Affine {
        &self.current
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.push(Affine::translation(dx, dy));
    }

    pub fn rotate(&mut self, theta: f64) {
        self.push(Affine::rotation(theta));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.push(Affine::scaling(sx, sy));
    }

    pub fn reset(&mut self) {
        self.current = Affine::IDENTITY;
    }

    fn push(&mut self, op: Affine) {
        self.current = self.current.then_local(&op);
    }
}
