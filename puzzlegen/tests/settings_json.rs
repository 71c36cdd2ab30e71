use puzzlegen::{Mesh, PuzzleError, PuzzleGenerator, PuzzleParams, Vec2};
use serde_json::json;

#[test]
fn empty_document_gives_defaults() {
    let p = PuzzleParams::from_json("{}").unwrap();
    assert_eq!(p, PuzzleParams::default());
    assert_eq!(p.rows, 4);
    assert_eq!(p.scale, 100.0);
    assert_eq!(p.tab_inward, 0.5);
    assert_eq!(p.origin, Vec2::new(15.0, 15.0));
    assert!(!p.carve_border);
}

#[test]
fn camel_case_keys_and_unknown_fields() {
    let v = json!({
        "rows": 2,
        "columns": 7,
        "tabSize": 0.5,
        "tabInward": 0.25,
        "carveBorder": true,
        "seed": -17,
        "origin": {"x": 0.0, "y": -3.5},
        "tool": "pen"
    });
    let p = PuzzleParams::from_json_value(v).unwrap();
    assert_eq!((p.rows, p.columns), (2, 7));
    assert_eq!(p.tab_size, 0.5);
    assert_eq!(p.tab_inward, 0.25);
    assert_eq!(p.tab_neck, 1.0);
    assert_eq!(p.seed, -17);
    assert_eq!(p.origin, Vec2::new(0.0, -3.5));
    assert!(p.carve_border);
}

#[test]
fn save_then_load_keeps_everything() {
    let p = PuzzleParams { rows: 3, columns: 5, jitter: 0.35, inset: 0.0, seed: 123456789, ..Default::default() };
    let text = p.to_json().unwrap();
    assert!(text.contains("\"tabOff\""));
    assert_eq!(PuzzleParams::from_json(&text).unwrap(), p);
    assert_eq!(p.to_json_value().unwrap()["columns"], json!(5));
}

#[test]
fn out_of_range_values_are_named() {
    let cases = [
        (json!({"rows": 0}), "rows"),
        (json!({"columns": 513}), "columns"),
        (json!({"rows": 300, "columns": 300}), "rows"),
        (json!({"scale": -1.0}), "scale"),
        (json!({"scale": 0.0}), "scale"),
        (json!({"tabNeck": 1.0e9}), "tabNeck"),
        (json!({"jitter": -0.1}), "jitter"),
        (json!({"inset": -0.5}), "inset"),
        (json!({"origin": {"x": 1.0e12, "y": 0.0}}), "origin"),
        (json!({"columns": 500, "scale": 100000.0}), "scale"),
    ];
    for (v, field) in cases {
        match PuzzleParams::from_json_value(v.clone()) {
            Err(PuzzleError::InvalidParam { name, .. }) => assert_eq!(name, field, "{}", v),
            other => panic!("{} should fail on {}, got {:?}", v, field, other.map(|_| ())),
        }
    }
}

#[test]
fn malformed_documents_are_json_errors() {
    let err = PuzzleParams::from_json("{\"rows\": \"four\"}").unwrap_err();
    assert_eq!(err.code(), "json");
    let err = PuzzleParams::from_json("not json").unwrap_err();
    assert!(matches!(err, PuzzleError::Json(_)));
    let err = PuzzleParams::from_json("{\"rows\": -2}").unwrap_err();
    assert_eq!(err.code(), "json");
}

#[test]
fn mesh_export_lists_boundaries() {
    let params = PuzzleParams { rows: 1, columns: 2, inset: 0.0, ..Default::default() };
    let mut g = PuzzleGenerator::new(params, Mesh::new());
    let report = g.gen().unwrap();
    let v = g.mesh().to_json_value();
    assert_eq!(v["version"], json!(1));
    assert_eq!(v["have_handles"], json!(true));
    assert_eq!(v["verts"].as_array().unwrap().len(), report.vertices);
    assert_eq!(v["edges"].as_array().unwrap().len(), report.edges);
    let faces = v["faces"].as_array().unwrap();
    assert_eq!(faces.len(), 2);
    for f in faces {
        assert_eq!(f["verts"].as_array().unwrap().len(), 16);
        assert_eq!(f["edges"].as_array().unwrap().len(), 16);
    }
}
