//! Radial half-edge mesh with curved (cubic Bézier) edges.
//!
//! Every element lives in a `Vec<Option<T>>` arena; the id is the index and a
//! `None` slot is a deleted element. Ids are not reused until `clear`.
//!
//! A face boundary is a cycle of loops linked by `next`/`prev`. A loop is one
//! directed use of an edge, running from `loop.v` to `loop.next.v`. All loops
//! using the same edge form a second cycle through `radial_next`/`radial_prev`;
//! with the operations below that cycle has at most two members.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::geometry::bezier::CubicBezier;
use crate::geometry::tolerance::MAX_LOOP_STEPS;
use crate::model::Vec2;

macro_rules! arena_id {
    ($name:ident, $tag:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $tag, self.0)
            }
        }
    };
}

arena_id!(VertId, "v");
arena_id!(EdgeId, "e");
arena_id!(LoopId, "l");
arena_id!(FaceId, "f");

#[derive(Clone, Debug)]
pub struct Vertex {
    pub co: Vec2,
    /// Every edge with this vertex as an endpoint.
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub v1: VertId,
    pub v2: VertId,
    /// Control handle on the `v1` side.
    pub h1: Vec2,
    /// Control handle on the `v2` side.
    pub h2: Vec2,
    /// Any loop of the radial cycle; `None` for a wire edge.
    pub l: Option<LoopId>,
}

impl Edge {
    pub fn other_vertex(&self, v: VertId) -> VertId {
        if self.v1 == v { self.v2 } else { self.v1 }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Loop {
    pub v: VertId,
    pub e: EdgeId,
    pub f: FaceId,
    pub next: LoopId,
    pub prev: LoopId,
    pub radial_next: LoopId,
    pub radial_prev: LoopId,
}

#[derive(Clone, Debug)]
pub struct Face {
    /// First loop of each boundary cycle; `lists[0]` is the outer boundary.
    pub lists: Vec<LoopId>,
}

/// Which handle of a loop's curve, relative to the traversal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleEnd {
    /// Adjacent to `loop.v`.
    Near,
    /// Adjacent to `loop.next.v`.
    Far,
}

pub struct Mesh {
    pub(crate) verts: Vec<Option<Vertex>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>,   // id is index
    pub(crate) loops: Vec<Option<Loop>>,   // id is index
    pub(crate) faces: Vec<Option<Face>>,   // id is index
    have_handles: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_handles(true)
    }

    /// With `have_handles == false` every edge is treated as a straight
    /// segment and handle writes are skipped by the generator passes.
    pub fn with_handles(have_handles: bool) -> Self {
        Mesh {
            verts: Vec::new(),
            edges: Vec::new(),
            loops: Vec::new(),
            faces: Vec::new(),
            have_handles,
        }
    }

    pub fn have_handles(&self) -> bool {
        self.have_handles
    }

    pub fn set_have_handles(&mut self, on: bool) {
        self.have_handles = on;
    }

    pub fn clear(&mut self) {
        self.verts.clear();
        self.edges.clear();
        self.loops.clear();
        self.faces.clear();
    }

    // Iteration / counts

    pub fn verts(&self) -> impl Iterator<Item = VertId> + '_ {
        self.verts.iter().enumerate().filter(|(_, v)| v.is_some()).map(|(i, _)| VertId(i as u32))
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().enumerate().filter(|(_, e)| e.is_some()).map(|(i, _)| EdgeId(i as u32))
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().enumerate().filter(|(_, f)| f.is_some()).map(|(i, _)| FaceId(i as u32))
    }

    pub fn vert_count(&self) -> usize {
        self.verts.iter().filter(|v| v.is_some()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    pub fn loop_count(&self) -> usize {
        self.loops.iter().filter(|l| l.is_some()).count()
    }

    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    // Element access

    pub fn vertex(&self, v: VertId) -> Result<&Vertex, MeshError> {
        self.verts.get(v.index()).and_then(|s| s.as_ref()).ok_or(MeshError::InvalidVertex(v))
    }

    fn vertex_mut(&mut self, v: VertId) -> Result<&mut Vertex, MeshError> {
        self.verts.get_mut(v.index()).and_then(|s| s.as_mut()).ok_or(MeshError::InvalidVertex(v))
    }

    pub fn edge(&self, e: EdgeId) -> Result<&Edge, MeshError> {
        self.edges.get(e.index()).and_then(|s| s.as_ref()).ok_or(MeshError::InvalidEdge(e))
    }

    fn edge_mut(&mut self, e: EdgeId) -> Result<&mut Edge, MeshError> {
        self.edges.get_mut(e.index()).and_then(|s| s.as_mut()).ok_or(MeshError::InvalidEdge(e))
    }

    pub fn loop_(&self, l: LoopId) -> Result<&Loop, MeshError> {
        self.loops.get(l.index()).and_then(|s| s.as_ref()).ok_or(MeshError::InvalidLoop(l))
    }

    fn loop_mut(&mut self, l: LoopId) -> Result<&mut Loop, MeshError> {
        self.loops.get_mut(l.index()).and_then(|s| s.as_mut()).ok_or(MeshError::InvalidLoop(l))
    }

    pub fn face(&self, f: FaceId) -> Result<&Face, MeshError> {
        self.faces.get(f.index()).and_then(|s| s.as_ref()).ok_or(MeshError::InvalidFace(f))
    }

    pub fn co(&self, v: VertId) -> Result<Vec2, MeshError> {
        Ok(self.vertex(v)?.co)
    }

    /// Move a vertex; handles on its side of every incident edge move with it.
    pub fn translate_vertex(&mut self, v: VertId, delta: Vec2) -> Result<(), MeshError> {
        let vert = self.vertex_mut(v)?;
        vert.co += delta;
        let edges = vert.edges.clone();
        for e in edges {
            let edge = self.edge_mut(e)?;
            if edge.v1 == v {
                edge.h1 += delta;
            }
            if edge.v2 == v {
                edge.h2 += delta;
            }
        }
        Ok(())
    }

    /// Place a vertex at `co`, carrying its handles rigidly.
    pub fn set_co(&mut self, v: VertId, co: Vec2) -> Result<(), MeshError> {
        let delta = co - self.co(v)?;
        self.translate_vertex(v, delta)
    }

    /// Place a vertex at `co` leaving every handle where it is.
    pub fn set_co_keep_handles(&mut self, v: VertId, co: Vec2) -> Result<(), MeshError> {
        self.vertex_mut(v)?.co = co;
        Ok(())
    }

    // Construction

    pub fn make_vertex(&mut self, co: Vec2) -> VertId {
        let id = VertId(self.verts.len() as u32);
        self.verts.push(Some(Vertex { co, edges: Vec::new() }));
        id
    }

    pub fn find_edge(&self, v1: VertId, v2: VertId) -> Option<EdgeId> {
        let vert = self.vertex(v1).ok()?;
        vert.edges.iter().copied().find(|&e| {
            self.edge(e).map_or(false, |edge| (edge.v1 == v1 && edge.v2 == v2) || (edge.v1 == v2 && edge.v2 == v1))
        })
    }

    /// Find or create the edge joining `v1` and `v2`. New edges are straight.
    pub fn make_edge(&mut self, v1: VertId, v2: VertId) -> Result<EdgeId, MeshError> {
        if v1 == v2 {
            return Err(MeshError::DuplicateVertex(v1));
        }
        let a = self.co(v1)?;
        let b = self.co(v2)?;
        if let Some(e) = self.find_edge(v1, v2) {
            return Ok(e);
        }
        Ok(self.push_edge(v1, v2, a, b))
    }

    fn push_edge(&mut self, v1: VertId, v2: VertId, a: Vec2, b: Vec2) -> EdgeId {
        let line = CubicBezier::line(a, b);
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(Edge { v1, v2, h1: line.p1, h2: line.p2, l: None }));
        for v in [v1, v2] {
            if let Some(Some(vert)) = self.verts.get_mut(v.index()) {
                vert.edges.push(id);
            }
        }
        id
    }

    /// Create a face whose boundary visits `vs` in order. Loop `i` runs from
    /// `vs[i]` to `vs[i + 1]`; `lists[0]` is the loop at `vs[0]`.
    pub fn make_face(&mut self, vs: &[VertId]) -> Result<FaceId, MeshError> {
        if vs.len() < 3 {
            return Err(MeshError::FaceTooSmall { len: vs.len() });
        }
        let mut seen = HashSet::with_capacity(vs.len());
        for &v in vs {
            self.vertex(v)?;
            if !seen.insert(v) {
                return Err(MeshError::DuplicateVertex(v));
            }
        }
        // Refuse before mutating anything if an existing edge is already full.
        for i in 0..vs.len() {
            if let Some(e) = self.find_edge(vs[i], vs[(i + 1) % vs.len()]) {
                if self.edge_loops(e)?.len() >= 2 {
                    return Err(MeshError::NonManifoldEdge(e));
                }
            }
        }

        let f = FaceId(self.faces.len() as u32);
        let first = LoopId(self.loops.len() as u32);
        let n = vs.len() as u32;
        for i in 0..vs.len() {
            let e = self.make_edge(vs[i], vs[(i + 1) % vs.len()])?;
            let id = first.0 + i as u32;
            self.loops.push(Some(Loop {
                v: vs[i],
                e,
                f,
                next: LoopId(first.0 + (i as u32 + 1) % n),
                prev: LoopId(first.0 + (i as u32 + n - 1) % n),
                radial_next: LoopId(id),
                radial_prev: LoopId(id),
            }));
            self.radial_append(e, LoopId(id))?;
        }
        self.faces.push(Some(Face { lists: vec![first] }));
        Ok(f)
    }

    fn radial_append(&mut self, e: EdgeId, l: LoopId) -> Result<(), MeshError> {
        match self.edge(e)?.l {
            None => {
                let lp = self.loop_mut(l)?;
                lp.radial_next = l;
                lp.radial_prev = l;
                self.edge_mut(e)?.l = Some(l);
            }
            Some(first) => {
                let last = self.loop_(first)?.radial_prev;
                {
                    let lp = self.loop_mut(l)?;
                    lp.radial_prev = last;
                    lp.radial_next = first;
                }
                self.loop_mut(last)?.radial_next = l;
                self.loop_mut(first)?.radial_prev = l;
            }
        }
        Ok(())
    }

    fn radial_remove(&mut self, e: EdgeId, l: LoopId) -> Result<(), MeshError> {
        let lp = *self.loop_(l)?;
        if lp.radial_next == l {
            self.edge_mut(e)?.l = None;
        } else {
            self.loop_mut(lp.radial_prev)?.radial_next = lp.radial_next;
            self.loop_mut(lp.radial_next)?.radial_prev = lp.radial_prev;
            let edge = self.edge_mut(e)?;
            if edge.l == Some(l) {
                edge.l = Some(lp.radial_next);
            }
        }
        let lp = self.loop_mut(l)?;
        lp.radial_next = l;
        lp.radial_prev = l;
        Ok(())
    }

    // Traversal

    /// Boundary loops of `f` starting at `lists[0]`, or `UnclosedLoop` if the
    /// cycle does not return within `MAX_LOOP_STEPS`.
    pub fn face_loops(&self, f: FaceId) -> Result<Vec<LoopId>, MeshError> {
        let start = *self.face(f)?.lists.first().ok_or(MeshError::InvalidFace(f))?;
        let mut out = Vec::new();
        let mut l = start;
        loop {
            if out.len() >= MAX_LOOP_STEPS {
                return Err(MeshError::UnclosedLoop { face: f, steps: out.len() });
            }
            out.push(l);
            l = self.loop_(l)?.next;
            if l == start {
                return Ok(out);
            }
        }
    }

    /// Loops in the radial cycle of `e` (empty for a wire edge).
    pub fn edge_loops(&self, e: EdgeId) -> Result<Vec<LoopId>, MeshError> {
        let Some(start) = self.edge(e)?.l else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let mut l = start;
        loop {
            if out.len() >= MAX_LOOP_STEPS {
                return Err(MeshError::Broken(format!("radial cycle of {} does not close", e)));
            }
            out.push(l);
            l = self.loop_(l)?.radial_next;
            if l == start {
                return Ok(out);
            }
        }
    }

    pub fn is_boundary_edge(&self, e: EdgeId) -> Result<bool, MeshError> {
        Ok(self.edge_loops(e)?.len() < 2)
    }

    // Curves

    /// Handles of `l`'s edge relabelled in the loop's traversal direction:
    /// `(near, far)` where `near` is adjacent to `l.v`.
    pub fn oriented_handles(&self, l: LoopId) -> Result<(Vec2, Vec2), MeshError> {
        let lp = self.loop_(l)?;
        let edge = self.edge(lp.e)?;
        if edge.v1 == lp.v {
            Ok((edge.h1, edge.h2))
        } else {
            Ok((edge.h2, edge.h1))
        }
    }

    pub fn set_loop_handle(&mut self, l: LoopId, end: HandleEnd, pos: Vec2) -> Result<(), MeshError> {
        let lp = *self.loop_(l)?;
        let edge = self.edge_mut(lp.e)?;
        let forward = edge.v1 == lp.v;
        match (end, forward) {
            (HandleEnd::Near, true) | (HandleEnd::Far, false) => edge.h1 = pos,
            (HandleEnd::Near, false) | (HandleEnd::Far, true) => edge.h2 = pos,
        }
        Ok(())
    }

    /// Curve of `l` in traversal direction. Straight when handles are off.
    pub fn loop_curve(&self, l: LoopId) -> Result<CubicBezier, MeshError> {
        let lp = self.loop_(l)?;
        let a = self.co(lp.v)?;
        let d = self.co(self.loop_(lp.next)?.v)?;
        if !self.have_handles {
            return Ok(CubicBezier::line(a, d));
        }
        let (near, far) = self.oriented_handles(l)?;
        Ok(CubicBezier::new(a, near, far, d))
    }

    /// Unit normal of `l`'s curve at `s`; points into the face for the
    /// winding produced by the grid builder.
    pub fn loop_normal(&self, l: LoopId, s: f64) -> Result<Vec2, MeshError> {
        Ok(self.loop_curve(l)?.normal(s))
    }

    pub fn edge_curve(&self, e: EdgeId) -> Result<CubicBezier, MeshError> {
        let edge = self.edge(e)?;
        let a = self.co(edge.v1)?;
        let d = self.co(edge.v2)?;
        if !self.have_handles {
            return Ok(CubicBezier::line(a, d));
        }
        Ok(CubicBezier::new(a, edge.h1, edge.h2, d))
    }

    // Editing

    /// Split `e` at parameter `t`. With `curved` (and handles on) the two
    /// halves reproduce the original curve; otherwise the new vertex sits on
    /// the chord and both halves are straight.
    pub fn split_edge(&mut self, e: EdgeId, t: f64, curved: bool) -> Result<VertId, MeshError> {
        self.split_edge_impl(e, t, curved).map(|(v, _)| v)
    }

    /// Returns the new vertex and the new edge running from it to the old `v2`.
    fn split_edge_impl(&mut self, e: EdgeId, t: f64, curved: bool) -> Result<(VertId, EdgeId), MeshError> {
        if !(t > 0.0 && t < 1.0) {
            return Err(MeshError::InvalidSplit { t });
        }
        let edge = *self.edge(e)?;
        let a = self.co(edge.v1)?;
        let d = self.co(edge.v2)?;
        let radial = self.edge_loops(e)?;

        let (first, second) = if curved && self.have_handles {
            CubicBezier::new(a, edge.h1, edge.h2, d).split_at(t)
        } else {
            let p = a.lerp(d, t);
            (CubicBezier::line(a, p), CubicBezier::line(p, d))
        };

        let nv = self.make_vertex(first.p3);
        let ne = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            v1: nv,
            v2: edge.v2,
            h1: second.p1,
            h2: second.p2,
            l: None,
        }));
        {
            let old = self.edge_mut(e)?;
            old.v2 = nv;
            old.h1 = first.p1;
            old.h2 = first.p2;
        }
        self.vertex_mut(nv)?.edges.extend([e, ne]);
        for slot in self.vertex_mut(edge.v2)?.edges.iter_mut() {
            if *slot == e {
                *slot = ne;
            }
        }

        for l in radial {
            let lp = *self.loop_(l)?;
            let nl = LoopId(self.loops.len() as u32);
            // The loop keeps its start vertex; the new loop starts at `nv`.
            let (l_edge, nl_edge) = if lp.v == edge.v1 { (e, ne) } else { (ne, e) };
            self.loops.push(Some(Loop {
                v: nv,
                e: nl_edge,
                f: lp.f,
                next: lp.next,
                prev: l,
                radial_next: nl,
                radial_prev: nl,
            }));
            self.loop_mut(lp.next)?.prev = nl;
            self.loop_mut(l)?.next = nl;
            if l_edge != e {
                self.radial_remove(e, l)?;
                self.loop_mut(l)?.e = l_edge;
                self.radial_append(l_edge, l)?;
            }
            self.radial_append(nl_edge, nl)?;
        }
        Ok((nv, ne))
    }

    /// Cut `e` into `n` parameter-equal pieces with `n - 1` ordered splits,
    /// each taken on the remaining tail. Returns the new vertices from `v1`
    /// towards `v2`.
    pub fn split_edge_multi(&mut self, e: EdgeId, n: usize) -> Result<Vec<VertId>, MeshError> {
        if n == 0 {
            return Err(MeshError::InvalidSegmentCount);
        }
        let mut out = Vec::with_capacity(n - 1);
        let mut tail = e;
        for k in 0..n - 1 {
            let t = 1.0 / (n - k) as f64;
            let (v, ne) = self.split_edge_impl(tail, t, true)?;
            out.push(v);
            tail = ne;
        }
        Ok(out)
    }

    pub fn kill_face(&mut self, f: FaceId) -> Result<(), MeshError> {
        self.face(f)?;
        let owned = match self.face_loops(f) {
            Ok(loops) => loops,
            // A cycle that does not close is collected by scanning the arena.
            Err(MeshError::UnclosedLoop { .. }) => self
                .loops
                .iter()
                .enumerate()
                .filter_map(|(i, l)| l.as_ref().filter(|lp| lp.f == f).map(|_| LoopId(i as u32)))
                .collect(),
            Err(e) => return Err(e),
        };
        for l in owned {
            let e = self.loop_(l)?.e;
            self.radial_remove(e, l)?;
            self.loops[l.index()] = None;
        }
        self.faces[f.index()] = None;
        Ok(())
    }

    /// Remove `e` together with every face using it.
    pub fn kill_edge(&mut self, e: EdgeId) -> Result<(), MeshError> {
        let edge = *self.edge(e)?;
        let mut faces = Vec::new();
        for l in self.edge_loops(e)? {
            let f = self.loop_(l)?.f;
            if !faces.contains(&f) {
                faces.push(f);
            }
        }
        for f in faces {
            self.kill_face(f)?;
        }
        for v in [edge.v1, edge.v2] {
            if let Ok(vert) = self.vertex_mut(v) {
                vert.edges.retain(|&x| x != e);
            }
        }
        self.edges[e.index()] = None;
        Ok(())
    }

    /// Remove `v`, its edges and every face touching those edges.
    pub fn kill_vertex(&mut self, v: VertId) -> Result<(), MeshError> {
        let edges = self.vertex(v)?.edges.clone();
        for e in edges {
            if self.edge(e).is_ok() {
                self.kill_edge(e)?;
            }
        }
        self.verts[v.index()] = None;
        Ok(())
    }

    /// Check every structural invariant; the first violation is reported.
    pub fn validate(&self) -> Result<(), MeshError> {
        let broken = |msg: String| Err(MeshError::Broken(msg));
        for v in self.verts() {
            let vert = self.vertex(v)?;
            if !vert.co.is_finite() {
                return broken(format!("{} has a non-finite position", v));
            }
            for &e in &vert.edges {
                let edge = self.edge(e)?;
                if edge.v1 != v && edge.v2 != v {
                    return broken(format!("{} lists {} which does not touch it", v, e));
                }
            }
        }
        for e in self.edges() {
            let edge = self.edge(e)?;
            if !edge.h1.is_finite() || !edge.h2.is_finite() {
                return broken(format!("{} has a non-finite handle", e));
            }
            for v in [edge.v1, edge.v2] {
                if !self.vertex(v)?.edges.contains(&e) {
                    return broken(format!("{} is missing from the edge list of {}", e, v));
                }
            }
            let radial = self.edge_loops(e)?;
            if radial.len() > 2 {
                return broken(format!("{} is used by {} faces", e, radial.len()));
            }
            for l in radial {
                let lp = self.loop_(l)?;
                if lp.e != e {
                    return broken(format!("{} is in the radial cycle of {} but uses {}", l, e, lp.e));
                }
                if self.loop_(lp.radial_next)?.radial_prev != l {
                    return broken(format!("radial links of {} are not symmetric", l));
                }
            }
        }
        for (i, slot) in self.loops.iter().enumerate() {
            let Some(lp) = slot else { continue };
            let l = LoopId(i as u32);
            if self.loop_(lp.next)?.prev != l || self.loop_(lp.prev)?.next != l {
                return broken(format!("{} breaks next/prev closure", l));
            }
            self.face(lp.f)?;
            let edge = self.edge(lp.e)?;
            let to = self.loop_(lp.next)?.v;
            let joins = (edge.v1 == lp.v && edge.v2 == to) || (edge.v2 == lp.v && edge.v1 == to);
            if !joins {
                return broken(format!("{} uses {} which does not join {} and {}", l, lp.e, lp.v, to));
            }
        }
        for f in self.faces() {
            for l in self.face_loops(f)? {
                if self.loop_(l)?.f != f {
                    return broken(format!("{} lies on the boundary of {} but names another face", l, f));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(m: &mut Mesh) -> (Vec<VertId>, FaceId) {
        let vs = vec![
            m.make_vertex(Vec2::new(0.0, 0.0)),
            m.make_vertex(Vec2::new(0.0, 10.0)),
            m.make_vertex(Vec2::new(10.0, 10.0)),
            m.make_vertex(Vec2::new(10.0, 0.0)),
        ];
        let f = m.make_face(&vs).unwrap();
        (vs, f)
    }

    #[test]
    fn make_face_links_cycle() {
        let mut m = Mesh::new();
        let (vs, f) = quad(&mut m);
        let loops = m.face_loops(f).unwrap();
        assert_eq!(loops.len(), 4);
        for (i, &l) in loops.iter().enumerate() {
            assert_eq!(m.loop_(l).unwrap().v, vs[i]);
        }
        assert_eq!(m.edge_count(), 4);
        m.validate().unwrap();
    }

    #[test]
    fn shared_edge_has_two_radial_loops() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 10.0));
        let b = m.make_vertex(Vec2::new(20.0, 0.0));
        m.make_face(&[vs[3], vs[2], a, b]).unwrap();
        let shared = m.find_edge(vs[2], vs[3]).unwrap();
        assert_eq!(m.edge_loops(shared).unwrap().len(), 2);
        assert!(!m.is_boundary_edge(shared).unwrap());
        assert_eq!(m.edge_count(), 7);
        m.validate().unwrap();
    }

    #[test]
    fn third_face_on_edge_is_rejected() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 5.0));
        m.make_face(&[vs[3], vs[2], a]).unwrap();
        let b = m.make_vertex(Vec2::new(15.0, -5.0));
        let before = m.loop_count();
        let err = m.make_face(&[vs[2], vs[3], b]).unwrap_err();
        assert!(matches!(err, MeshError::NonManifoldEdge(_)));
        assert_eq!(m.loop_count(), before);
    }

    #[test]
    fn oriented_handles_follow_traversal() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 10.0));
        let b = m.make_vertex(Vec2::new(20.0, 0.0));
        let f2 = m.make_face(&[vs[3], vs[2], a, b]).unwrap();
        let e = m.find_edge(vs[2], vs[3]).unwrap();
        let loops = m.edge_loops(e).unwrap();
        let (n0, f0) = m.oriented_handles(loops[0]).unwrap();
        let (n1, f1) = m.oriented_handles(loops[1]).unwrap();
        assert_eq!((n0, f0), (f1, n1));

        let l = m.face_loops(f2).unwrap()[0];
        m.set_loop_handle(l, HandleEnd::Near, Vec2::new(13.0, 2.0)).unwrap();
        let (near, _) = m.oriented_handles(l).unwrap();
        assert_eq!(near, Vec2::new(13.0, 2.0));
    }

    #[test]
    fn split_keeps_curve_and_both_faces() {
        let mut m = Mesh::new();
        let (vs, f) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 10.0));
        let b = m.make_vertex(Vec2::new(20.0, 0.0));
        let f2 = m.make_face(&[vs[3], vs[2], a, b]).unwrap();
        let e = m.find_edge(vs[2], vs[3]).unwrap();
        {
            let edge = m.edge_mut(e).unwrap();
            edge.h1 = Vec2::new(14.0, 7.0);
            edge.h2 = Vec2::new(6.0, 2.0);
        }
        let before = m.edge_curve(e).unwrap();
        let nv = m.split_edge(e, 0.5, true).unwrap();
        assert!((m.co(nv).unwrap() - before.eval(0.5)).length() < 1e-12);
        assert_eq!(m.face_loops(f).unwrap().len(), 5);
        assert_eq!(m.face_loops(f2).unwrap().len(), 5);
        let halves: Vec<_> = m.vertex(nv).unwrap().edges.clone();
        assert_eq!(halves.len(), 2);
        for h in halves {
            assert_eq!(m.edge_loops(h).unwrap().len(), 2);
        }
        let first = m.edge_curve(e).unwrap();
        assert!((first.eval(0.5) - before.eval(0.25)).length() < 1e-9);
        m.validate().unwrap();
    }

    #[test]
    fn straight_split_lands_on_chord() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let e = m.find_edge(vs[0], vs[1]).unwrap();
        m.edge_mut(e).unwrap().h1 = Vec2::new(-5.0, 3.0);
        let nv = m.split_edge(e, 0.25, false).unwrap();
        assert!((m.co(nv).unwrap() - Vec2::new(0.0, 2.5)).length() < 1e-12);
        m.validate().unwrap();
    }

    #[test]
    fn split_rejects_endpoint_parameters() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let e = m.find_edge(vs[0], vs[1]).unwrap();
        assert!(matches!(m.split_edge(e, 0.0, true), Err(MeshError::InvalidSplit { .. })));
        assert!(matches!(m.split_edge(e, 1.0, false), Err(MeshError::InvalidSplit { .. })));
        assert!(matches!(m.split_edge(e, f64::NAN, false), Err(MeshError::InvalidSplit { .. })));
    }

    #[test]
    fn split_multi_gives_equal_pieces() {
        let mut m = Mesh::new();
        let (vs, f) = quad(&mut m);
        let e = m.find_edge(vs[0], vs[1]).unwrap();
        let cuts = m.split_edge_multi(e, 4).unwrap();
        assert_eq!(cuts.len(), 3);
        for (k, v) in cuts.iter().enumerate() {
            let expect = Vec2::new(0.0, 2.5 * (k + 1) as f64);
            assert!((m.co(*v).unwrap() - expect).length() < 1e-9);
        }
        assert_eq!(m.face_loops(f).unwrap().len(), 7);
        assert!(m.split_edge_multi(e, 1).unwrap().is_empty());
        m.validate().unwrap();
    }

    #[test]
    fn translate_moves_own_side_handles() {
        let mut m = Mesh::new();
        let (vs, _) = quad(&mut m);
        let e = m.find_edge(vs[0], vs[1]).unwrap();
        let before = *m.edge(e).unwrap();
        m.translate_vertex(vs[0], Vec2::new(1.0, -2.0)).unwrap();
        let after = *m.edge(e).unwrap();
        let moved = if before.v1 == vs[0] { (before.h1, after.h1, before.h2, after.h2) } else { (before.h2, after.h2, before.h1, after.h1) };
        assert_eq!(moved.1, moved.0 + Vec2::new(1.0, -2.0));
        assert_eq!(moved.3, moved.2);
    }

    #[test]
    fn kill_vertex_removes_incident_faces() {
        let mut m = Mesh::new();
        let (vs, f) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 10.0));
        let b = m.make_vertex(Vec2::new(20.0, 0.0));
        let f2 = m.make_face(&[vs[3], vs[2], a, b]).unwrap();
        m.kill_vertex(vs[0]).unwrap();
        assert!(m.face(f).is_err());
        assert!(m.face(f2).is_ok());
        assert_eq!(m.vert_count(), 5);
        assert_eq!(m.edge_count(), 5);
        m.validate().unwrap();
        let shared = m.find_edge(vs[2], vs[3]).unwrap();
        assert_eq!(m.edge_loops(shared).unwrap().len(), 1);
    }

    #[test]
    fn unclosed_boundary_is_reported() {
        let mut m = Mesh::new();
        let (_, f) = quad(&mut m);
        let loops = m.face_loops(f).unwrap();
        // Short-circuit the cycle so it never returns to lists[0].
        m.loops[loops[3].index()].as_mut().unwrap().next = loops[1];
        let err = m.face_loops(f).unwrap_err();
        assert_eq!(err, MeshError::UnclosedLoop { face: f, steps: MAX_LOOP_STEPS });
        assert!(m.validate().is_err());
    }

    #[test]
    fn kill_face_only_touches_its_own_loops() {
        let mut m = Mesh::new();
        let (vs, f) = quad(&mut m);
        let a = m.make_vertex(Vec2::new(20.0, 10.0));
        let b = m.make_vertex(Vec2::new(20.0, 0.0));
        let f2 = m.make_face(&[vs[3], vs[2], a, b]).unwrap();
        m.kill_face(f).unwrap();
        assert_eq!(m.loop_count(), 4);
        assert_eq!(m.face_loops(f2).unwrap().len(), 4);
        m.validate().unwrap();
    }

    #[test]
    fn kill_face_clears_a_broken_cycle() {
        let mut m = Mesh::new();
        let (_, f) = quad(&mut m);
        let loops = m.face_loops(f).unwrap();
        m.loops[loops[3].index()].as_mut().unwrap().next = loops[1];
        m.kill_face(f).unwrap();
        assert_eq!(m.loop_count(), 0);
        assert_eq!(m.face_count(), 0);
        m.validate().unwrap();
    }

    #[test]
    fn straight_mode_ignores_stored_handles() {
        let mut m = Mesh::with_handles(false);
        let (vs, f) = quad(&mut m);
        let e = m.find_edge(vs[0], vs[1]).unwrap();
        m.edge_mut(e).unwrap().h1 = Vec2::new(-50.0, 0.0);
        let l = m.face_loops(f).unwrap()[0];
        let n = m.loop_normal(l, 0.0).unwrap();
        assert!((n - Vec2::new(1.0, 0.0)).length() < 1e-12);
    }
}
