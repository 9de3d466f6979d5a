//! Sphere Extraction Demo
//!
//! This example extracts a sphere SDF with both variants:
//! 1. Sample a sphere SDF on a dense grid
//! 2. Extract triangles (marching cubes) and quads (dual marching cubes)
//! 3. Repeat with a bounded random deformation
//! 4. Run a backward pass and report gradient magnitudes
//! 5. Export every mesh as OBJ
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin sphere_extraction -- 64 output/
//! ```

use std::env;
use std::path::{Path, PathBuf};

use instant::Instant;

use iso_rs::{
    backward, dual_marching_cubes, marching_cubes, DeformField, ExtractConfig, Mesh, ScalarField,
    Vec3,
};

const RADIUS: f32 = 0.35;
const DEFORM_BOUND: f32 = 0.5;

fn sphere_field(n: usize) -> ScalarField<f32> {
    let h = 1.0 / (n - 1) as f32;
    ScalarField::from_fn([n, n, n], |i, j, k| {
        let p = Vec3::new(i as f32 * h, j as f32 * h, k as f32 * h) - Vec3::splat(0.5);
        p.length() - RADIUS
    })
    .expect("resolution is at least 2")
}

/// Deterministic pseudo-random raw offsets, bounded by `DEFORM_BOUND * tanh`.
fn random_deformation(n: usize) -> DeformField<f32> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32) * 2.0 - 1.0
    };
    let raw: Vec<[f32; 3]> = (0..n * n * n).map(|_| [next(), next(), next()]).collect();
    DeformField::saturated([n, n, n], &raw, DEFORM_BOUND).expect("shape matches the field")
}

fn print_mesh<const K: usize>(label: &str, mesh: &Mesh<f32, K>, millis: f64) {
    let stats = mesh.stats();
    println!("  {}", label);
    println!("    Vertices:      {}", stats.vertex_count);
    println!("    Faces:         {} ({}-gons)", stats.face_count, K);
    println!("    Surface area:  {:.5} (sphere: {:.5})", stats.surface_area, 4.0 * std::f32::consts::PI * RADIUS * RADIUS);
    println!("    Volume:        {:.5}", mesh.signed_volume());
    println!("    Watertight:    {}", mesh.is_watertight());
    println!("    Oriented:      {}", mesh.is_consistently_oriented());
    println!("    Time:          {:.2} ms", millis);
}

fn write_obj<const K: usize>(dir: &Path, name: &str, mesh: &Mesh<f32, K>) {
    let path = dir.join(name);
    match std::fs::write(&path, mesh.to_obj()) {
        Ok(()) => println!("  Wrote {}", path.display()),
        Err(e) => eprintln!("  Failed to write {}: {}", path.display(), e),
    }
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════");
    println!("          Differentiable Isosurface Extraction: Sphere");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let args: Vec<String> = env::args().collect();
    let resolution = args
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n >= 2)
        .unwrap_or(64);
    let output_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or("output"));
    std::fs::create_dir_all(&output_dir).ok();

    println!("  Resolution:      {}³", resolution);
    println!("  Output:          {}", output_dir.display());
    println!();

    let field = sphere_field(resolution);
    let config = ExtractConfig::default();

    // =========================================================================
    // Step 1: Plain extraction
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 1: Extract Without Deformation                         │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let start = Instant::now();
    let tri = match marching_cubes(&field, None, &config) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("Marching cubes failed: {}", e);
            std::process::exit(1);
        }
    };
    print_mesh("Marching cubes", &tri.mesh, start.elapsed().as_secs_f64() * 1e3);

    let start = Instant::now();
    let quad = match dual_marching_cubes(&field, None, &config) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("Dual marching cubes failed: {}", e);
            std::process::exit(1);
        }
    };
    print_mesh("Dual marching cubes", &quad.mesh, start.elapsed().as_secs_f64() * 1e3);
    println!();

    // =========================================================================
    // Step 2: Deformed extraction
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 2: Extract With Bounded Deformation                    │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let deform = random_deformation(resolution);
    println!("  Max offset:      {:.3} grid units", deform.max_abs());

    let start = Instant::now();
    let tri_deformed = match marching_cubes(&field, Some(&deform), &config) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("Deformed marching cubes failed: {}", e);
            std::process::exit(1);
        }
    };
    print_mesh("Marching cubes (deformed)", &tri_deformed.mesh, start.elapsed().as_secs_f64() * 1e3);

    let start = Instant::now();
    let quad_deformed = match dual_marching_cubes(&field, Some(&deform), &config) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("Deformed dual marching cubes failed: {}", e);
            std::process::exit(1);
        }
    };
    print_mesh("Dual marching cubes (deformed)", &quad_deformed.mesh, start.elapsed().as_secs_f64() * 1e3);
    println!();

    // =========================================================================
    // Step 3: Backward pass
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 3: Backward Pass (L = Σ |v - c|)                       │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let center = Vec3::splat(0.5f32);
    let upstream: Vec<[f32; 3]> = tri_deformed
        .mesh
        .vertices
        .iter()
        .map(|&v| {
            let d = Vec3::from(v) - center;
            (d / d.length()).to_array()
        })
        .collect();

    let start = Instant::now();
    match backward(&tri_deformed.record, &upstream) {
        Ok(grads) => {
            let touched = grads.scalar.iter().filter(|&&g| g != 0.0).count();
            let scalar_norm = grads.scalar.iter().map(|g| g * g).sum::<f32>().sqrt();
            let offset_norm = grads
                .deformation
                .as_ref()
                .map(|d| d.iter().flatten().map(|g| g * g).sum::<f32>().sqrt())
                .unwrap_or(0.0);
            println!("  Samples touched: {} of {}", touched, grads.scalar.len());
            println!("  |dL/ds|:         {:.5}", scalar_norm);
            println!("  |dL/do|:         {:.5}", offset_norm);
            println!("  Time:            {:.2} ms", start.elapsed().as_secs_f64() * 1e3);
        }
        Err(e) => eprintln!("  Backward failed: {}", e),
    }
    println!();

    // =========================================================================
    // Step 4: Export
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 4: Export OBJ                                          │");
    println!("└─────────────────────────────────────────────────────────────┘");

    write_obj(&output_dir, "sphere_mc.obj", &tri.mesh);
    write_obj(&output_dir, "sphere_dmc.obj", &quad.mesh);
    write_obj(&output_dir, "sphere_mc_deformed.obj", &tri_deformed.mesh);
    write_obj(&output_dir, "sphere_dmc_deformed.obj", &quad_deformed.mesh);
}
