//! Cubic Bézier evaluation and analytic offset-curve helpers.
//!
//! Scalar functions take the four control values of one axis; the `Vec2`
//! variants apply them per axis. Everything here is closed-form, with no
//! iteration and no trigonometry.

use crate::geometry::tolerance::EPS_LEN;
use crate::model::Vec2;

/// Scalar cubic Bézier `B(s)` in Bernstein form, exact at both endpoints.
#[inline]
pub fn cubic(k1: f64, k2: f64, k3: f64, k4: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    let ss = s * s;
    let uu = u * u;
    uu * u * k1 + 3.0 * uu * s * k2 + 3.0 * u * ss * k3 + ss * s * k4
}

/// First derivative `B'(s)`.
#[inline]
pub fn dcubic(k1: f64, k2: f64, k3: f64, k4: f64, s: f64) -> f64 {
    -3.0 * ((s - 1.0).powi(2) * k1 - k4 * s * s + (3.0 * s - 2.0) * k3 * s
        - (3.0 * s - 1.0) * (s - 1.0) * k2)
}

/// Second derivative `B''(s)`, linear in `s`.
#[inline]
pub fn d2cubic(k1: f64, k2: f64, k3: f64, k4: f64, s: f64) -> f64 {
    -6.0 * (k1 * s - k1 - 3.0 * k2 * s + 2.0 * k2 + 3.0 * k3 * s - k3 - k4 * s)
}

pub fn cubic_point(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64) -> Vec2 {
    Vec2::new(cubic(a.x, b.x, c.x, d.x, s), cubic(a.y, b.y, c.y, d.y, s))
}

pub fn cubic_derivative(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64) -> Vec2 {
    Vec2::new(dcubic(a.x, b.x, c.x, d.x, s), dcubic(a.y, b.y, c.y, d.y, s))
}

pub fn cubic_derivative2(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64) -> Vec2 {
    Vec2::new(d2cubic(a.x, b.x, c.x, d.x, s), d2cubic(a.y, b.y, c.y, d.y, s))
}

/// Point on the curve offset by `radius` along `(dy, -dx)/|B'|`, expressed
/// relative to `a`. Returns the chord `d - a` at a stationary point.
pub fn offset_point(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64, radius: f64) -> Vec2 {
    let dv = cubic_derivative(a, b, c, d, s);
    if dv.x == 0.0 && dv.y == 0.0 {
        return d - a;
    }
    let len = dv.length();
    let p = cubic_point(a, b, c, d, s) - a;
    p + Vec2::new(dv.y / len, -dv.x / len) * radius
}

/// Derivative of the offset curve at `s`.
///
/// Differentiating `B + r * (dy, -dx)/|B'|` leaves `B'` scaled by
/// `1 + r * (dx*dy2 - dx2*dy) / |B'|^3`. Handles of a cubic approximating
/// the offset curve sit a third of this vector away from the endpoints.
/// Returns the chord `d - a` at a stationary point.
pub fn offset_tangent(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64, radius: f64) -> Vec2 {
    let dv = cubic_derivative(a, b, c, d, s);
    let dv2 = cubic_derivative2(a, b, c, d, s);
    let (dx, dy) = (dv.x, dv.y);
    let (dx2, dy2) = (dv2.x, dv2.y);

    if dx == 0.0 && dy == 0.0 {
        return d - a;
    }

    let len2 = dx * dx + dy * dy;
    let len = len2.sqrt();
    let div = len * len2;
    let fac = (len * len2 + (dx * dy2 - dx2 * dy) * radius) / div;

    Vec2::new(dx * fac, dy * fac)
}

/// Unit normal `(dy, -dx)/|B'|`. At a stationary point the chord is used
/// instead; a fully collapsed curve yields zero.
pub fn curve_normal(a: Vec2, b: Vec2, c: Vec2, d: Vec2, s: f64) -> Vec2 {
    let dv = cubic_derivative(a, b, c, d, s);
    let len = dv.length();
    if len > EPS_LEN {
        return Vec2::new(dv.y / len, -dv.x / len);
    }
    let chord = d - a;
    Vec2::new(chord.y, -chord.x).normalized()
}

/// de Casteljau split at `t`; the halves cover `0..t` and `t..1`.
pub fn split_cubic(a: Vec2, b: Vec2, c: Vec2, d: Vec2, t: f64) -> ([Vec2; 4], [Vec2; 4]) {
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let cd = c.lerp(d, t);
    let abc = ab.lerp(bc, t);
    let bcd = bc.lerp(cd, t);
    let p = abc.lerp(bcd, t);
    ([a, ab, abc, p], [p, bcd, cd, d])
}

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Straight segment with handles at 1/3 and 2/3, so `s` maps linearly
    /// onto the chord.
    pub fn line(p0: Vec2, p3: Vec2) -> Self {
        Self::new(p0, p0.lerp(p3, 1.0 / 3.0), p0.lerp(p3, 2.0 / 3.0), p3)
    }

    pub fn eval(&self, s: f64) -> Vec2 {
        cubic_point(self.p0, self.p1, self.p2, self.p3, s)
    }

    pub fn derivative(&self, s: f64) -> Vec2 {
        cubic_derivative(self.p0, self.p1, self.p2, self.p3, s)
    }

    pub fn normal(&self, s: f64) -> Vec2 {
        curve_normal(self.p0, self.p1, self.p2, self.p3, s)
    }

    pub fn offset_point(&self, s: f64, radius: f64) -> Vec2 {
        offset_point(self.p0, self.p1, self.p2, self.p3, s, radius)
    }

    pub fn offset_tangent(&self, s: f64, radius: f64) -> Vec2 {
        offset_tangent(self.p0, self.p1, self.p2, self.p3, s, radius)
    }

    pub fn split_at(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let ([a, b, c, d], [e, f, g, h]) = split_cubic(self.p0, self.p1, self.p2, self.p3, t);
        (CubicBezier::new(a, b, c, d), CubicBezier::new(e, f, g, h))
    }
}
