use crate::error::PuzzleError;
use crate::mesh::Mesh;
use crate::model::{PuzzleParams, Vec2};
use serde::Serialize;
use serde_json::Value;

pub fn params_from_value(v: Value) -> Result<PuzzleParams, PuzzleError> {
    let p: PuzzleParams = serde_json::from_value(v)?;
    p.validate()?;
    Ok(p)
}

pub fn params_from_str(s: &str) -> Result<PuzzleParams, PuzzleError> {
    let p: PuzzleParams = serde_json::from_str(s)?;
    p.validate()?;
    Ok(p)
}

pub fn mesh_to_json_impl(m: &Mesh) -> Value {
    #[derive(Serialize)]
    struct VertSer {
        id: u32,
        x: f64,
        y: f64,
    }
    #[derive(Serialize)]
    struct EdgeSer {
        id: u32,
        a: u32,
        b: u32,
        ha: Vec2,
        hb: Vec2,
    }
    #[derive(Serialize)]
    struct FaceSer {
        id: u32,
        verts: Vec<u32>,
        edges: Vec<u32>,
    }
    #[derive(Serialize)]
    struct MeshSer {
        version: u32,
        have_handles: bool,
        verts: Vec<VertSer>,
        edges: Vec<EdgeSer>,
        faces: Vec<FaceSer>,
    }

    let verts = m
        .verts
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_ref().map(|v| VertSer { id: i as u32, x: v.co.x, y: v.co.y }))
        .collect();
    let edges = m
        .edges
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            e.as_ref().map(|e| EdgeSer { id: i as u32, a: e.v1.0, b: e.v2.0, ha: e.h1, hb: e.h2 })
        })
        .collect();
    let mut faces = Vec::new();
    for f in m.faces() {
        // A face whose boundary does not close is left out of the export.
        let Ok(loops) = m.face_loops(f) else { continue };
        let mut fs = FaceSer { id: f.0, verts: Vec::with_capacity(loops.len()), edges: Vec::with_capacity(loops.len()) };
        for l in loops {
            if let Ok(lp) = m.loop_(l) {
                fs.verts.push(lp.v.0);
                fs.edges.push(lp.e.0);
            }
        }
        faces.push(fs);
    }

    serde_json::to_value(MeshSer { version: 1, have_handles: m.have_handles(), verts, edges, faces })
        .unwrap_or(Value::Null)
}
