//! Shape Fitting Demo
//!
//! Gradient descent through the extractor:
//! 1. Grow a small sphere to a target radius by optimising the scalar field
//!    (marching cubes, `dL/ds`)
//! 2. Shrink-wrap a dual mesh onto a slightly larger sphere by optimising a
//!    bounded per-sample deformation (dual marching cubes, `dL/d(raw)`)
//!
//! The loss is `Σ (|v - c| - R)²` over mesh vertices, measured in grid units.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin shape_fitting -- 32 80
//! ```

use std::env;

use instant::Instant;

use iso_rs::{DeformField, DiffMc, DualMc, ExtractConfig, ScalarField, Vec3, VertexSpace};

const DEFORM_BOUND: f32 = 0.5;

/// Loss and `dL/dv` for vertices against a sphere.
fn sphere_loss(vertices: &[[f32; 3]], center: Vec3<f32>, radius: f32) -> (f32, Vec<[f32; 3]>) {
    let mut loss = 0.0;
    let grad = vertices
        .iter()
        .map(|&v| {
            let d = Vec3::from(v) - center;
            let r = d.length();
            let err = r - radius;
            loss += err * err;
            if r > 0.0 {
                (d * (2.0 * err / r)).to_array()
            } else {
                [0.0; 3]
            }
        })
        .collect();
    (loss, grad)
}

fn rms(loss: f32, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        (loss / count as f32).sqrt()
    }
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════");
    println!("          Differentiable Isosurface Extraction: Fitting");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let args: Vec<String> = env::args().collect();
    let n = args
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n >= 8)
        .unwrap_or(32);
    let iterations = args.get(2).and_then(|s| s.parse::<usize>().ok()).unwrap_or(80);

    let center = Vec3::splat((n - 1) as f32 * 0.5);
    let start_radius = n as f32 * 0.2;
    let target_radius = n as f32 * 0.3;
    let config = ExtractConfig::new().with_space(VertexSpace::Index);

    println!("  Grid:            {}³", n);
    println!("  Iterations:      {}", iterations);
    println!();

    // =========================================================================
    // Step 1: Optimise the scalar field
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 1: Fit Scalar Field (marching cubes)                   │");
    println!("└─────────────────────────────────────────────────────────────┘");
    println!("  Radius {:.2} → {:.2}", start_radius, target_radius);

    let mut field = match ScalarField::from_fn([n, n, n], |i, j, k| {
        (Vec3::new(i as f32, j as f32, k as f32) - center).length() - start_radius
    }) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Failed to build field: {}", e);
            std::process::exit(1);
        }
    };

    let learning_rate = 0.02;
    let mut extractor = DiffMc::new(config);
    let start = Instant::now();

    for step in 0..=iterations {
        let mesh = match extractor.forward(&field, None) {
            Ok(mesh) => mesh,
            Err(e) => {
                eprintln!("  Forward failed at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        let (loss, upstream) = sphere_loss(&mesh.vertices, center, target_radius);
        if step % 10 == 0 || step == iterations {
            println!(
                "  step {:>4}  vertices {:>6}  rms error {:.4}",
                step,
                mesh.num_vertices(),
                rms(loss, mesh.num_vertices())
            );
        }
        if step == iterations {
            break;
        }

        let grads = match extractor.backward(&upstream) {
            Ok(grads) => grads,
            Err(e) => {
                eprintln!("  Backward failed at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        for (s, g) in field.values_mut().iter_mut().zip(&grads.scalar) {
            *s -= learning_rate * g;
        }
    }
    println!("  Time:            {:.2} ms", start.elapsed().as_secs_f64() * 1e3);
    println!();

    // =========================================================================
    // Step 2: Optimise a bounded deformation
    // =========================================================================
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ Step 2: Fit Deformation (dual marching cubes)               │");
    println!("└─────────────────────────────────────────────────────────────┘");

    let field = match ScalarField::from_fn([n, n, n], |i, j, k| {
        (Vec3::new(i as f32, j as f32, k as f32) - center).length() - target_radius
    }) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Failed to build field: {}", e);
            std::process::exit(1);
        }
    };
    let wrap_radius = target_radius + 0.3;
    println!("  Radius {:.2} → {:.2} (offset bound {})", target_radius, wrap_radius, DEFORM_BOUND);

    let mut raw = vec![[0.0f32; 3]; n * n * n];
    let learning_rate = 0.5;
    let mut extractor = DualMc::new(config);
    let start = Instant::now();

    for step in 0..=iterations {
        let deform = match DeformField::saturated([n, n, n], &raw, DEFORM_BOUND) {
            Ok(deform) => deform,
            Err(e) => {
                eprintln!("  Invalid deformation at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        let mesh = match extractor.forward(&field, Some(&deform)) {
            Ok(mesh) => mesh,
            Err(e) => {
                eprintln!("  Forward failed at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        let (loss, upstream) = sphere_loss(&mesh.vertices, center, wrap_radius);
        if step % 10 == 0 || step == iterations {
            println!(
                "  step {:>4}  quads {:>6}  rms error {:.4}  max offset {:.3}",
                step,
                mesh.num_faces(),
                rms(loss, mesh.num_vertices()),
                deform.max_abs()
            );
        }
        if step == iterations {
            break;
        }

        let offset_grads = match extractor.backward(&upstream) {
            Ok(grads) => grads.deformation.unwrap_or_default(),
            Err(e) => {
                eprintln!("  Backward failed at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        let raw_grads = match DeformField::saturated_backward(&raw, &offset_grads, DEFORM_BOUND) {
            Ok(grads) => grads,
            Err(e) => {
                eprintln!("  Chain rule failed at step {}: {}", step, e);
                std::process::exit(1);
            }
        };
        for (r, g) in raw.iter_mut().zip(&raw_grads) {
            for axis in 0..3 {
                r[axis] -= learning_rate * g[axis];
            }
        }
    }
    println!("  Time:            {:.2} ms", start.elapsed().as_secs_f64() * 1e3);
}
