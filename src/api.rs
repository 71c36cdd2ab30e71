use crate::PuzzleGenerator;
use crate::error;
use crate::interop::{arr_f64, arr_u32, new_obj, set_kv};
use puzzlegen::PuzzleParams;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route the core crate's `log` output to the browser console. Without the
/// `debug_logs` feature this does nothing.
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(feature = "debug_logs")]
    {
        use wasm_bindgen_console_logger::DEFAULT_LOGGER;
        // A second call finds the logger already installed.
        if log::set_logger(&DEFAULT_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Debug);
        }
    }
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
impl PuzzleGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PuzzleGenerator {
        crate::PuzzleGenerator::rs_new()
    }

    /// Replace the parameters from a plain JS object (settings-file keys).
    /// Nothing is regenerated; an invalid object leaves the old parameters.
    pub fn reset(&mut self, params: JsValue) -> JsValue {
        let p: PuzzleParams = match serde_wasm_bindgen::from_value(params) {
            Ok(p) => p,
            Err(e) => return error::bad_params(format!("settings object: {}", e)),
        };
        if let Err(e) = p.validate() {
            return error::from_puzzle(&e);
        }
        self.inner.set_params(p);
        error::ok(JsValue::from_bool(true))
    }

    pub fn reset_json(&mut self, text: &str) -> JsValue {
        match PuzzleParams::from_json(text) {
            Ok(p) => {
                self.inner.set_params(p);
                error::ok(JsValue::from_bool(true))
            }
            Err(e) => error::from_puzzle(&e),
        }
    }

    pub fn params_json(&self) -> String {
        self.rs_params().to_json().unwrap_or_default()
    }

    pub fn params(&self) -> JsValue {
        to_js(self.rs_params())
    }

    pub fn gen(&mut self) -> JsValue {
        match self.inner.gen() {
            Ok(report) => error::ok(to_js(&report)),
            Err(e) => {
                // Bad input is the caller's to report; topology failures are ours.
                #[cfg(target_arch = "wasm32")]
                if !matches!(e, puzzlegen::PuzzleError::InvalidParam { .. }) {
                    web_sys::console::error_1(&JsValue::from_str(&format!("puzzlegen: {}", e)));
                }
                error::from_puzzle(&e)
            }
        }
    }

    pub fn have_handles(&self) -> bool {
        self.rs_mesh().have_handles()
    }

    /// Takes effect on the next `gen()`.
    pub fn set_have_handles(&mut self, on: bool) {
        self.inner.mesh_mut().set_have_handles(on);
    }

    pub fn vertex_count(&self) -> u32 {
        self.rs_mesh().vert_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.rs_mesh().edge_count() as u32
    }
    pub fn face_count(&self) -> u32 {
        self.rs_mesh().face_count() as u32
    }

    // Typed arrays getters
    pub fn get_vertex_data(&self) -> JsValue {
        let m = self.rs_mesh();
        let mut ids = Vec::with_capacity(m.vert_count());
        let mut pos = Vec::with_capacity(m.vert_count() * 2);
        for v in m.verts() {
            if let Ok(co) = m.co(v) {
                ids.push(v.0);
                pos.extend([co.x, co.y]);
            }
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        obj.into()
    }

    /// `endpoints` holds `v1, v2` per edge and `handles` holds
    /// `h1.x, h1.y, h2.x, h2.y`; with handles off these are the straight
    /// third-points.
    pub fn get_edge_data(&self) -> JsValue {
        let m = self.rs_mesh();
        let mut ids = Vec::with_capacity(m.edge_count());
        let mut ends = Vec::with_capacity(m.edge_count() * 2);
        let mut handles = Vec::with_capacity(m.edge_count() * 4);
        for e in m.edges() {
            let (Ok(edge), Ok(curve)) = (m.edge(e), m.edge_curve(e)) else { continue };
            ids.push(e.0);
            ends.extend([edge.v1.0, edge.v2.0]);
            handles.extend([curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y]);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&ends).into());
        set_kv(&obj, "handles", &arr_f64(&handles).into());
        obj.into()
    }

    /// Boundary of every face as vertex and edge ids; face `k` owns
    /// `verts[offsets[k]..offsets[k + 1]]`.
    pub fn get_face_data(&self) -> JsValue {
        let m = self.rs_mesh();
        let mut ids = Vec::with_capacity(m.face_count());
        let mut offsets = vec![0u32];
        let mut verts = Vec::new();
        let mut edges = Vec::new();
        for f in m.faces() {
            let Ok(loops) = m.face_loops(f) else { continue };
            ids.push(f.0);
            for l in loops {
                if let Ok(lp) = m.loop_(l) {
                    verts.push(lp.v.0);
                    edges.push(lp.e.0);
                }
            }
            offsets.push(verts.len() as u32);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "offsets", &arr_u32(&offsets).into());
        set_kv(&obj, "verts", &arr_u32(&verts).into());
        set_kv(&obj, "edges", &arr_u32(&edges).into());
        obj.into()
    }

    pub fn mesh_json(&self) -> JsValue {
        to_js(&self.rs_mesh().to_json_value())
    }
}

impl Default for PuzzleGenerator {
    fn default() -> Self {
        Self::new()
    }
}
