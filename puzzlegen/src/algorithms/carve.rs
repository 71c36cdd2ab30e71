//! Tab carving: bends two sides of every grid face into interlocking tabs.
//!
//! Each face visits its `(i,j)->(i,j+1)` side and its `(i,j+1)->(i+1,j+1)`
//! side. Every interior vertical side is the first kind for exactly one face
//! and every interior horizontal side the second kind for exactly one face.
//! The visited set keeps the carve-once rule independent of that layout.
//!
//! Random draws, per carved side and in face order: polarity, neck width,
//! shoulder inward offset, head jitter x, head jitter y. Skipped sides draw
//! nothing.

use std::collections::HashSet;

use rand::RngCore;

use crate::algorithms::grid::SIDE_SEGMENTS;
use crate::error::PuzzleError;
use crate::mesh::{EdgeId, HandleEnd, Mesh};
use crate::model::{PuzzleParams, Vec2};

/// Uniform source of doubles in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::random::<f64>(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabParams {
    pub cell_scale: f64,
    pub tab_size: f64,
    pub tab_off: f64,
    pub tab_neck: f64,
    pub tab_inward: f64,
    pub jitter: f64,
    pub carve_border: bool,
}

impl From<&PuzzleParams> for TabParams {
    fn from(p: &PuzzleParams) -> Self {
        TabParams {
            cell_scale: p.scale,
            tab_size: p.tab_size,
            tab_off: p.tab_off,
            tab_neck: p.tab_neck,
            tab_inward: p.tab_inward,
            jitter: p.jitter,
            carve_border: p.carve_border,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CarveReport {
    /// First edge of every carved side, in carve order.
    pub carved: Vec<EdgeId>,
    pub border_skipped: usize,
}

struct Side {
    /// Direction the tab head moves for `flip == 1`.
    off: Vec2,
    /// Axis the side runs along.
    axis: usize,
}

const SIDES: [Side; 2] = [
    Side { off: Vec2::new(1.0, 0.0), axis: 1 },
    Side { off: Vec2::new(0.0, -1.0), axis: 0 },
];

pub fn carve_tabs<R>(mesh: &mut Mesh, params: &TabParams, rng: &mut R) -> Result<CarveReport, PuzzleError>
where
    R: UniformSource + ?Sized,
{
    let mut report = CarveReport::default();
    let mut visited: HashSet<EdgeId> = HashSet::new();
    let handles = mesh.have_handles();
    let faces: Vec<_> = mesh.faces().collect();

    for f in faces {
        let loops = mesh.face_loops(f)?;
        if loops.len() != 4 * SIDE_SEGMENTS {
            log::warn!("face {} has {} loops, expected {}; not carved", f, loops.len(), 4 * SIDE_SEGMENTS);
            continue;
        }

        for (k, side) in SIDES.iter().enumerate() {
            let chain = &loops[k * SIDE_SEGMENTS..(k + 1) * SIDE_SEGMENTS];
            let (l, l1, l2, l3) = (chain[0], chain[1], chain[2], chain[3]);

            let first = mesh.loop_(l)?.e;
            if visited.contains(&first) {
                continue;
            }
            if mesh.is_boundary_edge(mesh.loop_(l1)?.e)? && !params.carve_border {
                report.border_skipped += 1;
                continue;
            }
            for &c in chain {
                visited.insert(mesh.loop_(c)?.e);
            }

            let sign = 1.0;
            let sign2 = if side.axis == 0 { -sign } else { sign };
            let axis = side.axis;
            let scale2 = params.cell_scale * params.tab_size * 0.25;

            let flip = if rng.next_unit() > 0.5 { -1.0 } else { 1.0 };
            let tab_neck2 = params.tab_neck + (rng.next_unit() - 0.5) * params.jitter * params.tab_neck;

            // Neck: pull the two shoulder vertices toward each other.
            let va = mesh.loop_(l1)?.v;
            let vm = mesh.loop_(l2)?.v;
            let vb = mesh.loop_(l3)?.v;
            let c = mesh.co(va)?.lerp(mesh.co(vb)?, 0.5);
            for v in [va, vb] {
                let co = mesh.co(v)?;
                mesh.set_co(v, c + (co - c) * (tab_neck2 * 0.5))?;
            }

            let inward = params.tab_inward + (rng.next_unit() - 0.5) * params.jitter * params.tab_inward;

            if handles {
                let mut h = mesh.co(va)?;
                *h.axis_mut(axis ^ 1) += sign2 * flip * scale2 * 0.5;
                *h.axis_mut(axis) += sign * scale2 * inward;
                mesh.set_loop_handle(l1, HandleEnd::Near, h)?;

                let mut h = mesh.co(vb)?;
                *h.axis_mut(axis ^ 1) += sign2 * flip * scale2 * 0.5;
                *h.axis_mut(axis) -= sign * scale2 * inward;
                mesh.set_loop_handle(l2, HandleEnd::Far, h)?;
            }

            // Head: protrude or indent, then roughen.
            let mut head = mesh.co(vm)? + side.off * (scale2 * flip);
            head.x += (rng.next_unit() - 0.5) * params.jitter * params.cell_scale * 0.25;
            head.y += (rng.next_unit() - 0.5) * params.jitter * params.cell_scale * 0.25;
            mesh.set_co(vm, head)?;

            if handles {
                let mut h = head;
                *h.axis_mut(axis) += sign * scale2 * params.tab_off;
                mesh.set_loop_handle(l2, HandleEnd::Near, h)?;

                let mut h = head;
                *h.axis_mut(axis) -= sign * scale2 * params.tab_off;
                mesh.set_loop_handle(l1, HandleEnd::Far, h)?;
            }

            report.carved.push(first);
        }
    }

    log::debug!(
        "carved {} tabs, {} border sides left flat",
        report.carved.len(),
        report.border_skipped
    );
    Ok(report)
}
