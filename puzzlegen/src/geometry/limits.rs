// Centralized parameter limits to harden against untrusted settings (JSON/JS)

// Grid size caps
pub const MAX_GRID_DIM: u32 = 512;
pub const MAX_CELLS: u64 = 65_536;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;
pub const SCALE_MAX: f64 = 100_000.0;
pub const FACTOR_MAX: f64 = 1_000.0; // tab/jitter/inset factors are relative to the cell scale

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_scale_bounds(s: f64) -> bool { s.is_finite() && s > 0.0 && s <= SCALE_MAX }

#[inline]
pub fn in_factor_bounds(f: f64) -> bool { f.is_finite() && f >= 0.0 && f <= FACTOR_MAX }
