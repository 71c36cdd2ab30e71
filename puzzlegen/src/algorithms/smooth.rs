use std::collections::HashSet;

use crate::error::MeshError;
use crate::mesh::{Mesh, VertId};
use crate::model::Vec2;

/// Laplacian smoothing: move each of `verts` by `fac` toward the average of
/// its edge neighbours. Averages are taken from the positions before any
/// vertex moves. With handles enabled and `do_handles`, each vertex carries
/// its own handles along; otherwise handles stay put.
pub fn vertex_smooth(mesh: &mut Mesh, verts: &[VertId], fac: f64, do_handles: bool) -> Result<(), MeshError> {
    let rigid = mesh.have_handles() && do_handles;
    let mut seen = HashSet::with_capacity(verts.len());
    let mut targets = Vec::with_capacity(verts.len());

    for &v in verts {
        if !seen.insert(v) {
            continue;
        }
        let vert = mesh.vertex(v)?;
        if vert.edges.is_empty() {
            continue;
        }
        let mut sum = Vec2::ZERO;
        for &e in &vert.edges {
            sum += mesh.co(mesh.edge(e)?.other_vertex(v))?;
        }
        let avg = sum * (1.0 / vert.edges.len() as f64);
        targets.push((v, vert.co.lerp(avg, fac)));
    }

    for (v, co) in targets {
        if rigid {
            mesh.set_co(v, co)?;
        } else {
            mesh.set_co_keep_handles(v, co)?;
        }
    }
    Ok(())
}
