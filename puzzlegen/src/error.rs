use thiserror::Error;

use crate::mesh::{EdgeId, FaceId, LoopId, VertId};

/// Failures of the mesh topology primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("invalid vertex {0}")]
    InvalidVertex(VertId),
    #[error("invalid edge {0}")]
    InvalidEdge(EdgeId),
    #[error("invalid loop {0}")]
    InvalidLoop(LoopId),
    #[error("invalid face {0}")]
    InvalidFace(FaceId),
    #[error("a face needs at least 3 vertices, got {len}")]
    FaceTooSmall { len: usize },
    #[error("vertex {0} appears twice in one face")]
    DuplicateVertex(VertId),
    #[error("edge {0} is already used by two faces")]
    NonManifoldEdge(EdgeId),
    #[error("boundary of face {face} did not close within {steps} steps")]
    UnclosedLoop { face: FaceId, steps: usize },
    #[error("split parameter {t} must lie strictly inside (0, 1)")]
    InvalidSplit { t: f64 },
    #[error("segment count must be at least 1")]
    InvalidSegmentCount,
    #[error("broken topology: {0}")]
    Broken(String),
}

/// Errors reported by grid building, carving, insetting and the generator.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("parameter '{name}' {reason}")]
    InvalidParam { name: &'static str, reason: String },
    #[error("inset aborted: boundary of face {face} did not close within {steps} steps")]
    UnclosedBoundary { face: FaceId, steps: usize },
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}

impl PuzzleError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PuzzleError::InvalidParam { name, reason: reason.into() }
    }

    /// Stable machine-readable code, used by the JS binding.
    pub fn code(&self) -> &'static str {
        match self {
            PuzzleError::InvalidParam { .. } => "invalid_param",
            PuzzleError::UnclosedBoundary { .. } => "unclosed_boundary",
            PuzzleError::Mesh(_) => "mesh",
            PuzzleError::Json(_) => "json",
        }
    }
}
