use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct PuzzleGenerator { pub(crate) inner: puzzlegen::PuzzleGenerator }

impl PuzzleGenerator {
    pub fn rs_new() -> PuzzleGenerator { PuzzleGenerator { inner: puzzlegen::PuzzleGenerator::default() } }
    pub fn rs_params(&self) -> &puzzlegen::PuzzleParams { self.inner.params() }
    pub fn rs_mesh(&self) -> &puzzlegen::Mesh { self.inner.mesh() }
}
