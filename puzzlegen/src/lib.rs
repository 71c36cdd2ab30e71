pub mod error;
pub mod generator;
pub mod mesh;
pub mod model;
pub mod geometry {
    pub mod bezier;
    pub mod limits;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod carve;
    pub mod grid;
    pub mod inset;
    pub mod smooth;
}
mod json;

pub use error::{MeshError, PuzzleError};
pub use generator::{GenReport, PuzzleGenerator};
pub use mesh::{EdgeId, FaceId, HandleEnd, LoopId, Mesh, VertId};
pub use model::{PuzzleParams, Vec2};

impl PuzzleParams {
    /// Parse and validate a settings document. Missing keys take their
    /// defaults and unknown keys are ignored.
    pub fn from_json(s: &str) -> Result<Self, PuzzleError> {
        json::params_from_str(s)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self, PuzzleError> {
        json::params_from_value(v)
    }

    pub fn to_json(&self) -> Result<String, PuzzleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, PuzzleError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Mesh {
    /// Snapshot of live vertices, edges (with handles) and face boundaries.
    pub fn to_json_value(&self) -> serde_json::Value {
        json::mesh_to_json_impl(self)
    }
}
