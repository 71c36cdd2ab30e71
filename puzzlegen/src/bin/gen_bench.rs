use puzzlegen::{Mesh, PuzzleGenerator, PuzzleParams};
use std::time::Instant;

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut sizes = vec![4u32, 8, 16, 32];
    let mut runs = 20usize;
    let mut jitter = 0.3f64;
    let mut inset = 0.1f64;
    let mut straight = false;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--sizes=") { let v: Vec<u32> = val.split(',').filter_map(|s| s.parse().ok()).collect(); if !v.is_empty() { sizes=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--jitter=") { if let Ok(v)=val.parse() { jitter=v; } }
        else if let Some(val)=a.strip_prefix("--inset=") { if let Ok(v)=val.parse() { inset=v; } }
        else if a == "--straight" { straight = true; }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let mut worst = 0.0f64;
    for &n in &sizes {
        let params = PuzzleParams { rows: n, columns: n, jitter, inset, seed: 7, ..Default::default() };
        let mut g = PuzzleGenerator::new(params, Mesh::with_handles(!straight));
        let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
        let mut last = None;
        for _ in 0..runs {
            let t0 = Instant::now();
            match g.gen() {
                Ok(r) => last = Some(r),
                Err(e) => { eprintln!("size {}: {}", n, e); std::process::exit(2); }
            }
            times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        }
        times_ms.sort_by(|a,b| a.total_cmp(b));
        let med = percentile(&times_ms, 0.5);
        let p90 = percentile(&times_ms, 0.9);
        worst = worst.max(med);
        let r = last.unwrap_or_default();
        println!("grid={}x{} runs={} verts={} edges={} faces={} carved={} median_ms={:.3} p90_ms={:.3}", n, n, runs, r.vertices, r.edges, r.faces, r.carved, med, p90);
    }
    if let Some(th) = assert_ms { if worst > th { eprintln!("FAIL: median {:.3} ms > threshold {:.3} ms", worst, th); std::process::exit(1); } }
}
