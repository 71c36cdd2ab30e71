use crate::error::PuzzleError;
use crate::geometry::limits;
use crate::mesh::{FaceId, Mesh, VertId};
use crate::model::Vec2;

/// Pieces each grid side is cut into: two neck vertices and the tab head
/// between them give three interior cut points.
pub const SIDE_SEGMENTS: usize = 4;

/// Addressing for the regular grid before subdivision.
#[derive(Clone, Debug)]
pub struct GridIndex {
    pub columns: u32,
    pub rows: u32,
    /// `(columns + 1) * (rows + 1)` corner vertices, `j * (columns + 1) + i`.
    pub verts: Vec<VertId>,
    /// `rows * columns` faces, `i * rows + j` (x-major creation order).
    pub faces: Vec<FaceId>,
}

impl GridIndex {
    pub fn vert(&self, i: u32, j: u32) -> Option<VertId> {
        if i > self.columns || j > self.rows {
            return None;
        }
        self.verts.get((j * (self.columns + 1) + i) as usize).copied()
    }

    pub fn face(&self, i: u32, j: u32) -> Option<FaceId> {
        if i >= self.columns || j >= self.rows {
            return None;
        }
        self.faces.get((i * self.rows + j) as usize).copied()
    }
}

/// Clear `mesh` and fill it with a `columns x rows` grid of quads of size
/// `cell_scale` starting at `origin`, every side cut into `SIDE_SEGMENTS`.
/// Columns run along x and rows along y.
///
/// Face `(i, j)` visits `(i,j) -> (i,j+1) -> (i+1,j+1) -> (i+1,j)`, so loop
/// normals `(dy, -dx)` point into the face and `lists[0]` sits on corner
/// `(i, j)`.
pub fn build_grid(
    mesh: &mut Mesh,
    rows: u32,
    columns: u32,
    cell_scale: f64,
    origin: Vec2,
) -> Result<GridIndex, PuzzleError> {
    for (name, dim) in [("rows", rows), ("columns", columns)] {
        if dim == 0 {
            return Err(PuzzleError::invalid(name, "must be at least 1"));
        }
        if dim > limits::MAX_GRID_DIM {
            return Err(PuzzleError::invalid(name, format!("must not exceed {}", limits::MAX_GRID_DIM)));
        }
    }
    if !limits::in_scale_bounds(cell_scale) {
        return Err(PuzzleError::invalid("scale", "must be finite and positive"));
    }

    mesh.clear();

    let w = columns + 1;
    let h = rows + 1;
    let mut verts = vec![VertId(0); (w * h) as usize];
    for i in 0..w {
        let x = origin.x + i as f64 * cell_scale;
        for j in 0..h {
            let y = origin.y + j as f64 * cell_scale;
            verts[(j * w + i) as usize] = mesh.make_vertex(Vec2::new(x, y));
        }
    }

    let mut faces = Vec::with_capacity((rows * columns) as usize);
    for i in 0..w - 1 {
        for j in 0..h - 1 {
            let v1 = verts[(j * w + i) as usize];
            let v2 = verts[((j + 1) * w + i) as usize];
            let v3 = verts[((j + 1) * w + i + 1) as usize];
            let v4 = verts[(j * w + i + 1) as usize];
            faces.push(mesh.make_face(&[v1, v2, v3, v4])?);
        }
    }

    let sides: Vec<_> = mesh.edges().collect();
    for e in sides {
        mesh.split_edge_multi(e, SIDE_SEGMENTS)?;
    }

    log::debug!(
        "grid {}x{}: {} verts, {} edges, {} faces",
        columns,
        rows,
        mesh.vert_count(),
        mesh.edge_count(),
        mesh.face_count()
    );

    Ok(GridIndex { columns, rows, verts, faces })
}
