use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::algorithms::carve::{carve_tabs, TabParams};
use crate::algorithms::grid::build_grid;
use crate::algorithms::inset::inset_mesh;
use crate::error::PuzzleError;
use crate::mesh::Mesh;
use crate::model::PuzzleParams;

/// Element counts of the mesh produced by one `gen()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenReport {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    /// Number of sides bent into tabs.
    pub carved: usize,
    /// Number of faces replaced by inset copies (0 when inset is disabled).
    pub inset_faces: usize,
}

/// Regenerates a puzzle outline into the mesh it owns.
pub struct PuzzleGenerator {
    params: PuzzleParams,
    mesh: Mesh,
}

impl PuzzleGenerator {
    pub fn new(params: PuzzleParams, mesh: Mesh) -> Self {
        Self { params, mesh }
    }

    /// Rebind parameters and mesh without regenerating.
    pub fn reset(&mut self, params: PuzzleParams, mesh: Mesh) {
        self.params = params;
        self.mesh = mesh;
    }

    pub fn params(&self) -> &PuzzleParams {
        &self.params
    }

    pub fn set_params(&mut self, params: PuzzleParams) {
        self.params = params;
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Build grid, carve tabs and optionally inset into a fresh mesh, then
    /// swap it in. On error the bound mesh is left as it was.
    pub fn gen(&mut self) -> Result<GenReport, PuzzleError> {
        let p = &self.params;
        p.validate()?;

        let mut mesh = Mesh::with_handles(self.mesh.have_handles());
        build_grid(&mut mesh, p.rows, p.columns, p.scale, p.origin)?;
        log::debug!("gen: grid done ({} edges)", mesh.edge_count());

        let mut rng = StdRng::seed_from_u64(p.seed as u64);
        let carve = carve_tabs(&mut mesh, &TabParams::from(p), &mut rng)?;
        log::debug!("gen: carved {} sides", carve.carved.len());

        let inset_faces = if p.inset > 0.0 {
            inset_mesh(&mut mesh, p.inset * p.scale)?.faces.len()
        } else {
            0
        };

        let report = GenReport {
            vertices: mesh.vert_count(),
            edges: mesh.edge_count(),
            faces: mesh.face_count(),
            carved: carve.carved.len(),
            inset_faces,
        };
        self.mesh = mesh;
        log::info!(
            "generated {}x{} puzzle (seed {}): {} verts, {} edges, {} faces",
            p.columns,
            p.rows,
            p.seed,
            report.vertices,
            report.edges,
            report.faces
        );
        Ok(report)
    }
}

impl Default for PuzzleGenerator {
    fn default() -> Self {
        Self::new(PuzzleParams::default(), Mesh::new())
    }
}
