// Centralized tolerances for the curve and inset math

pub const EPS_LEN: f64 = 1e-12;           // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-15;         // denominator guard for ratios

// Miter correction never pushes a corner further than this multiple of the
// requested inset distance.
pub const MITER_LIMIT: f64 = 4.0;

// Bounded walk over loop cycles; a boundary longer than this is malformed.
pub const MAX_LOOP_STEPS: usize = 10_000;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
