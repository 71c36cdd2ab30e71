use crate::interop::{new_obj, set_kv};
use puzzlegen::PuzzleError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// `{ok:false, error}` for a generator failure; `data` names the offending
/// parameter or face where there is one.
pub fn from_puzzle(e: &PuzzleError) -> JsValue {
    let data = match e {
        PuzzleError::InvalidParam { name, .. } => {
            let d = new_obj();
            set_kv(&d, "param", &JsValue::from_str(name));
            Some(d.into())
        }
        PuzzleError::UnclosedBoundary { face, steps } => {
            let d = new_obj();
            set_kv(&d, "face", &JsValue::from_f64(face.0 as f64));
            set_kv(&d, "steps", &JsValue::from_f64(*steps as f64));
            Some(d.into())
        }
        PuzzleError::Mesh(_) | PuzzleError::Json(_) => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn bad_params(message: impl Into<String>) -> JsValue {
    err("json", message, None)
}
