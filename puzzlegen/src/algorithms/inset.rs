//! Inset every face boundary by a fixed distance to open a cutting gap
//! between neighbouring pieces.
//!
//! Each face gets a private copy of its boundary vertices, so after the pass
//! no two faces share an edge and the original outline is gone.

use crate::error::{MeshError, PuzzleError};
use crate::geometry::tolerance::{clamp, EPS_DENOM, MITER_LIMIT};
use crate::mesh::{FaceId, HandleEnd, Mesh, VertId};
use crate::model::Vec2;

#[derive(Clone, Debug, Default)]
pub struct InsetReport {
    /// Inner faces, one per face that was inset.
    pub faces: Vec<FaceId>,
}

/// Corner offset that keeps both adjacent sides `distance` away from the
/// original boundary, for unit side normals `n1` and `n2`.
///
/// Capped at `MITER_LIMIT * distance` for near-reversing corners.
pub fn miter_distance(distance: f64, n1: Vec2, n2: Vec2) -> f64 {
    let th = clamp(n1.dot(n2), -1.0, 1.0).acos();
    let c = (th * 0.5).cos();
    let cap = MITER_LIMIT * distance;
    if c <= EPS_DENOM {
        return cap;
    }
    (distance / c).min(cap)
}

/// Unit bisector of two unit normals; `n2` when they cancel out.
pub fn bisector(n1: Vec2, n2: Vec2) -> Vec2 {
    let n = n1.lerp(n2, 0.5).normalized();
    if n == Vec2::ZERO {
        n2
    } else {
        n
    }
}

/// Replace every face boundary with a private copy moved `distance` inward.
///
/// Sides are first split at their midpoints. Each corner moves along the
/// bisector of its two side normals by `distance / cos(theta / 2)`, where
/// `theta` is the angle between the normals, capped at
/// `MITER_LIMIT * distance` (corners turning more than about 151 degrees hit
/// the cap). Inner handles follow the offset curve's tangent at each end.
pub fn inset_mesh(mesh: &mut Mesh, distance: f64) -> Result<InsetReport, PuzzleError> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(PuzzleError::invalid("inset", "must be finite and non-negative"));
    }
    if distance == 0.0 {
        return Ok(InsetReport::default());
    }

    let faces: Vec<FaceId> = mesh.faces().collect();

    split_sides(mesh)?;
    let outer: Vec<VertId> = mesh.verts().collect();

    let mut report = InsetReport::default();
    let mut failure = None;
    for f in faces {
        match inset_face(mesh, f, distance) {
            Ok(inner) => report.faces.push(inner),
            Err(MeshError::UnclosedLoop { face, steps }) => {
                log::error!("inset: boundary of {} did not close after {} steps; face dropped", face, steps);
                failure.get_or_insert(PuzzleError::UnclosedBoundary { face, steps });
            }
            Err(e) => return Err(e.into()),
        }
    }

    for v in outer {
        if mesh.vertex(v).is_ok() {
            mesh.kill_vertex(v)?;
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }
    log::debug!("inset {} faces by {}", report.faces.len(), distance);
    Ok(report)
}

/// Split every edge at `t = 0.5`, returning the midpoints in edge order.
///
/// With handles the split follows the curve (de Casteljau), so carved tabs
/// keep their shape before they are offset; a chord split would flatten
/// them. Without handles this is the plain straight split.
fn split_sides(mesh: &mut Mesh) -> Result<Vec<VertId>, MeshError> {
    let edges: Vec<_> = mesh.edges().collect();
    let mut mids = Vec::with_capacity(edges.len());
    for e in edges {
        mids.push(mesh.split_edge(e, 0.5, true)?);
    }
    Ok(mids)
}

fn inset_face(mesh: &mut Mesh, f: FaceId, distance: f64) -> Result<FaceId, MeshError> {
    let outer = mesh.face_loops(f)?;
    let mut vs = Vec::with_capacity(outer.len());
    for &l in &outer {
        let co = mesh.co(mesh.loop_(l)?.v)?;
        vs.push(mesh.make_vertex(co));
    }
    let inner_face = mesh.make_face(&vs)?;
    let inner = mesh.face_loops(inner_face)?;

    let n = outer.len();
    let handles = mesh.have_handles();
    for k in 0..n {
        let l1 = outer[k];
        let prev = outer[(k + n - 1) % n];
        let n1 = mesh.loop_normal(prev, 1.0)?;
        let n2 = mesh.loop_normal(l1, 0.0)?;
        let d2 = miter_distance(distance, n1, n2);
        let dir = bisector(n1, n2);
        if dir == Vec2::ZERO {
            log::warn!("inset: {} has no usable normal; vertex left in place", l1);
        }

        let co = mesh.co(vs[k])? + dir * d2;
        mesh.set_co_keep_handles(vs[k], co)?;

        if handles {
            let t = mesh.loop_curve(l1)?.offset_tangent(0.0, d2);
            mesh.set_loop_handle(inner[k], HandleEnd::Near, co + t * (1.0 / 3.0))?;
            let t = mesh.loop_curve(prev)?.offset_tangent(1.0, d2);
            mesh.set_loop_handle(inner[(k + n - 1) % n], HandleEnd::Far, co - t * (1.0 / 3.0))?;
        }
    }
    Ok(inner_face)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::carve::{carve_tabs, TabParams, UniformSource};
    use crate::algorithms::grid::{build_grid, SIDE_SEGMENTS};
    use crate::model::PuzzleParams;

    #[test]
    fn straight_corner_keeps_distance() {
        let n = Vec2::new(0.0, 1.0);
        assert_eq!(miter_distance(7.5, n, n), 7.5);
        let d = miter_distance(5.0, Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!((d - 5.0 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn reversing_corner_is_capped() {
        let d = miter_distance(2.0, Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0));
        assert_eq!(d, 2.0 * MITER_LIMIT);
        assert_eq!(bisector(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0)), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn sharp_corner_offset_is_capped_at_miter_limit() {
        let n1 = Vec2::new(1.0, 0.0);
        let turn = |deg: f64| Vec2::new(deg.to_radians().cos(), deg.to_radians().sin());
        // 150 degrees: 1 / cos(75) is just under the limit.
        let d = miter_distance(2.0, n1, turn(150.0));
        assert!((d - 2.0 / 75f64.to_radians().cos()).abs() < 1e-9);
        assert!(d < 2.0 * MITER_LIMIT);
        // 170 degrees would need 1 / cos(85), about 11.5.
        assert_eq!(miter_distance(2.0, n1, turn(170.0)), 2.0 * MITER_LIMIT);
    }

    #[test]
    fn single_face_moves_inward_by_distance() {
        let mut m = Mesh::new();
        let grid = build_grid(&mut m, 1, 1, 100.0, Vec2::ZERO).unwrap();
        let outer: Vec<_> = m.verts().collect();
        let report = inset_mesh(&mut m, 5.0).unwrap();
        assert_eq!(report.faces.len(), 1);
        assert!(m.face(grid.faces[0]).is_err());
        for v in outer {
            assert!(m.vertex(v).is_err());
        }

        let loops = m.face_loops(report.faces[0]).unwrap();
        assert_eq!(loops.len(), 8 * SIDE_SEGMENTS);
        assert_eq!(m.vert_count(), 8 * SIDE_SEGMENTS);
        for l in loops {
            let p = m.co(m.loop_(l).unwrap().v).unwrap();
            let on_x = (p.x - 5.0).abs() < 1e-9 || (p.x - 95.0).abs() < 1e-9;
            let on_y = (p.y - 5.0).abs() < 1e-9 || (p.y - 95.0).abs() < 1e-9;
            assert!(on_x || on_y, "{:?} is off the inset square", p);
            assert!(p.x > 5.0 - 1e-9 && p.x < 95.0 + 1e-9);
            assert!(p.y > 5.0 - 1e-9 && p.y < 95.0 + 1e-9);

            // Straight sides stay straight.
            let curve = m.loop_curve(l).unwrap();
            let mid = curve.eval(0.5);
            assert!((mid - curve.p0.lerp(curve.p3, 0.5)).length() < 1e-9);
        }
        m.validate().unwrap();
    }

    #[test]
    fn neighbours_no_longer_share_edges() {
        let mut m = Mesh::new();
        build_grid(&mut m, 1, 2, 100.0, Vec2::ZERO).unwrap();
        let report = inset_mesh(&mut m, 3.0).unwrap();
        assert_eq!(report.faces.len(), 2);
        assert_eq!(m.face_count(), 2);
        for e in m.edges() {
            assert_eq!(m.edge_loops(e).unwrap().len(), 1);
        }
        m.validate().unwrap();
    }

    /// Cycles through a fixed list of draws.
    struct Cycle(Vec<f64>, usize);

    impl UniformSource for Cycle {
        fn next_unit(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    fn assert_parallel(a: Vec2, b: Vec2) {
        assert!(a.length() > 1e-9 && b.length() > 1e-9, "{:?} {:?}", a, b);
        let cross = a.x * b.y - a.y * b.x;
        assert!(cross.abs() <= 1e-6 * a.length() * b.length(), "{:?} not parallel to {:?}", a, b);
    }

    #[test]
    fn carved_boundary_offsets_along_bisectors() {
        let params = PuzzleParams { rows: 1, columns: 2, scale: 100.0, jitter: 0.3, ..Default::default() };
        let mut m = Mesh::new();
        build_grid(&mut m, 1, 2, 100.0, Vec2::ZERO).unwrap();
        let mut rng = Cycle(vec![0.2, 0.7, 0.4, 0.9, 0.1], 0);
        let carved = carve_tabs(&mut m, &TabParams::from(&params), &mut rng).unwrap();
        assert_eq!(carved.carved.len(), 1);

        // Midpoints land on the carved curves, not on their chords.
        let curves: Vec<_> = m.edges().map(|e| m.edge_curve(e).unwrap()).collect();
        let mids = split_sides(&mut m).unwrap();
        let mut bent = 0;
        for (c, v) in curves.iter().zip(&mids) {
            let p = m.co(*v).unwrap();
            assert!((p - c.eval(0.5)).length() < 1e-9);
            if (p - c.p0.lerp(c.p3, 0.5)).length() > 1e-6 {
                bent += 1;
            }
        }
        assert!(bent > 0);

        let d = 2.0;
        let faces: Vec<_> = m.faces().collect();
        for f in faces {
            let outer = m.face_loops(f).unwrap();
            let inner_face = inset_face(&mut m, f, d).unwrap();
            let inner = m.face_loops(inner_face).unwrap();
            let n = outer.len();
            assert_eq!(inner.len(), n);
            for k in 0..n {
                let l1 = outer[k];
                let prev = outer[(k + n - 1) % n];
                let n1 = m.loop_normal(prev, 1.0).unwrap();
                let n2 = m.loop_normal(l1, 0.0).unwrap();
                let base = m.co(m.loop_(l1).unwrap().v).unwrap();
                let co = m.co(m.loop_(inner[k]).unwrap().v).unwrap();
                let want = base + bisector(n1, n2) * miter_distance(d, n1, n2);
                assert!((co - want).length() < 1e-9, "corner {}: {:?} vs {:?}", k, co, want);

                let (near, _) = m.oriented_handles(inner[k]).unwrap();
                assert_parallel(near - co, m.loop_curve(l1).unwrap().derivative(0.0));
                let (_, far) = m.oriented_handles(inner[(k + n - 1) % n]).unwrap();
                assert_parallel(co - far, m.loop_curve(prev).unwrap().derivative(1.0));
            }
        }
    }

    #[test]
    fn zero_distance_is_a_no_op() {
        let mut m = Mesh::new();
        build_grid(&mut m, 2, 2, 10.0, Vec2::ZERO).unwrap();
        let before = (m.vert_count(), m.edge_count(), m.face_count());
        let report = inset_mesh(&mut m, 0.0).unwrap();
        assert!(report.faces.is_empty());
        assert_eq!((m.vert_count(), m.edge_count(), m.face_count()), before);
    }

    #[test]
    fn rejects_bad_distance() {
        let mut m = Mesh::new();
        build_grid(&mut m, 1, 1, 10.0, Vec2::ZERO).unwrap();
        for d in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(inset_mesh(&mut m, d), Err(PuzzleError::InvalidParam { name: "inset", .. })));
        }
        assert_eq!(m.face_count(), 1);
    }

    #[test]
    fn unclosed_boundary_drops_face_and_reports() {
        let mut m = Mesh::new();
        let grid = build_grid(&mut m, 1, 1, 10.0, Vec2::ZERO).unwrap();
        let loops = m.face_loops(grid.faces[0]).unwrap();
        m.loops[loops[3].index()].as_mut().unwrap().next = loops[1];
        let err = inset_mesh(&mut m, 1.0).unwrap_err();
        assert!(matches!(err, PuzzleError::UnclosedBoundary { face, .. } if face == grid.faces[0]));
        assert_eq!(m.face_count(), 0);
    }
}
