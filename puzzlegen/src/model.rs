use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::geometry::limits;
use crate::geometry::tolerance::EPS_LEN;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, o: Vec2) -> f64 {
        self.x * o.x + self.y * o.y
    }

    #[inline]
    pub fn length_sq(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    /// Unit vector, or zero when the length is below `EPS_LEN`.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > EPS_LEN {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    #[inline]
    pub fn lerp(self, o: Vec2, t: f64) -> Vec2 {
        Vec2::new(self.x + (o.x - self.x) * t, self.y + (o.y - self.y) * t)
    }

    /// Component by axis index (0 = x, 1 = y).
    #[inline]
    pub fn axis(self, axis: usize) -> f64 {
        if axis == 0 { self.x } else { self.y }
    }

    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut f64 {
        if axis == 0 { &mut self.x } else { &mut self.y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 { Vec2::new(self.x + o.x, self.y + o.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 { Vec2::new(self.x - o.x, self.y - o.y) }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f64) -> Vec2 { Vec2::new(self.x * s, self.y * s) }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 { Vec2::new(-self.x, -self.y) }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) { self.x += o.x; self.y += o.y; }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, o: Vec2) { self.x -= o.x; self.y -= o.y; }
}

/// Everything one regeneration depends on. Key names follow the settings
/// file written by the puzzle editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PuzzleParams {
    pub rows: u32,
    pub columns: u32,
    /// Cell edge length.
    pub scale: f64,
    pub jitter: f64,
    pub tab_size: f64,
    pub tab_off: f64,
    pub tab_neck: f64,
    pub tab_inward: f64,
    /// Inset distance as a fraction of `scale`; 0 disables the inset pass.
    pub inset: f64,
    pub seed: i64,
    pub origin: Vec2,
    /// Carve tabs into the outer border sides as well.
    pub carve_border: bool,
}

impl Default for PuzzleParams {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 4,
            scale: 100.0,
            jitter: 0.0,
            tab_size: 1.0,
            tab_off: 1.0,
            tab_neck: 1.0,
            tab_inward: 0.5,
            inset: 0.1,
            seed: 0,
            origin: Vec2::new(15.0, 15.0),
            carve_border: false,
        }
    }
}

impl PuzzleParams {
    /// Precondition check run before any mesh is touched.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        for (name, dim) in [("rows", self.rows), ("columns", self.columns)] {
            if dim == 0 {
                return Err(PuzzleError::invalid(name, "must be at least 1"));
            }
            if dim > limits::MAX_GRID_DIM {
                return Err(PuzzleError::invalid(
                    name,
                    format!("must not exceed {}", limits::MAX_GRID_DIM),
                ));
            }
        }
        if self.rows as u64 * self.columns as u64 > limits::MAX_CELLS {
            return Err(PuzzleError::invalid(
                "rows",
                format!("rows * columns must not exceed {}", limits::MAX_CELLS),
            ));
        }
        if !limits::in_scale_bounds(self.scale) {
            return Err(PuzzleError::invalid(
                "scale",
                format!("must be finite and in (0, {}]", limits::SCALE_MAX),
            ));
        }
        let factors = [
            ("jitter", self.jitter),
            ("tabSize", self.tab_size),
            ("tabOff", self.tab_off),
            ("tabNeck", self.tab_neck),
            ("tabInward", self.tab_inward),
            ("inset", self.inset),
        ];
        for (name, value) in factors {
            if !limits::in_factor_bounds(value) {
                return Err(PuzzleError::invalid(
                    name,
                    format!("must be finite and in [0, {}]", limits::FACTOR_MAX),
                ));
            }
        }
        if !limits::in_coord_bounds(self.origin.x) || !limits::in_coord_bounds(self.origin.y) {
            return Err(PuzzleError::invalid("origin", "must be finite and within coordinate bounds"));
        }
        let far_x = self.origin.x + self.columns as f64 * self.scale;
        let far_y = self.origin.y + self.rows as f64 * self.scale;
        if !limits::in_coord_bounds(far_x) || !limits::in_coord_bounds(far_y) {
            return Err(PuzzleError::invalid("scale", "grid extends past coordinate bounds"));
        }
        Ok(())
    }
}
