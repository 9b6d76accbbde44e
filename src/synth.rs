//! # Synthetic logs
//!
//! Writes logs in the simulation layout for a particle tumbling under a slowly drifting angular
//! velocity. Handy for trying the plotter without a simulation run and for tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use nalgebra::{Matrix3, Rotation3, Vector3};
use rand::prelude::*;
use rand::ChaChaRng;

use crate::schema;

/// # Fields
///
/// * `records` - number of record lines after the header
/// * `dt` - time step between records
/// * `drift` - largest per step change of each angular velocity component
/// * `seed` - same seed, same log. `None` seeds from entropy
#[derive(Debug, Clone)]
pub struct SynthParams {
    pub records: usize,
    pub dt: f64,
    pub drift: f64,
    pub seed: Option<[u8; 32]>,
}

impl Default for SynthParams {
    fn default() -> SynthParams {
        SynthParams { records: 2000, dt: 0.01, drift: 0.05, seed: None }
    }
}

fn row_major(m: &Matrix3<f64>) -> String {
    let mut s = String::with_capacity(9 * 24);
    for r in 0..3 {
        for c in 0..3 {
            if r + c > 0 { s.push(' '); }
            s.push_str(&format!("{}", m[(r, c)]));
        }
    }
    s
}

/// All lines of a synthetic log, header included
pub fn generate_lines(params: &SynthParams) -> Vec<String> {
    let mut random = if let Some(seed) = params.seed {
        ChaChaRng::from_seed(seed)
    } else {
        ChaChaRng::from_entropy()
    };

    let mut lines = Vec::with_capacity(schema::HEADER_LINES + params.records);
    let k: Vector3<f64> = Vector3::new(random.gen_range(-1.0, 1.0), random.gen_range(-1.0, 1.0),
                                       1.0);
    let k = k.normalize();
    let q: Matrix3<f64> = Rotation3::from_euler_angles(random.gen_range(-3.0, 3.0),
                                                       random.gen_range(-1.5, 1.5),
                                                       random.gen_range(-3.0, 3.0)).into_inner();

    // header, positions have to match the layout the loader expects
    lines.push("# synthetic rotation log".to_string());
    lines.push(format!("k-vector = {} {} {}", k.x, k.y, k.z));
    while lines.len() < schema::REFERENCE_MATRIX_LINES.start {
        lines.push(format!("# preamble {}", lines.len() + 1));
    }
    for r in 0..3 {
        lines.push(format!("{} {} {}", q[(r, 0)], q[(r, 1)], q[(r, 2)]));
    }
    lines.push("# step | - | - | w | n | - | - | t dt |w| | R".to_string());
    while lines.len() < schema::HEADER_LINES {
        lines.push("#".to_string());
    }

    let mut rotation: Matrix3<f64> = Matrix3::identity();
    let mut w: Vector3<f64> = Vector3::new(random.gen_range(-2.0, 2.0),
                                           random.gen_range(-2.0, 2.0),
                                           random.gen_range(-2.0, 2.0));
    for step in 0..params.records {
        let t = step as f64 * params.dt;
        let n = (rotation * q).column(schema::ORIENTATION_COLUMN).into_owned()
            + Vector3::<f64>::new(random.gen_range(-0.01, 0.01), random.gen_range(-0.01, 0.01),
                                  random.gen_range(-0.01, 0.01));
        lines.push(format!("{} | 0 | 0 | {} {} {} | {} {} {} | 0 | 0 | {} {} {} | {}",
                           step, w.x, w.y, w.z, n.x, n.y, n.z, t, params.dt, w.norm(),
                           row_major(&rotation)));

        rotation = Rotation3::from_scaled_axis(w * params.dt).into_inner() * rotation;
        if params.drift > 0.0 {
            for i in 0..3 {
                w[i] += random.gen_range(-params.drift, params.drift);
            }
        }
    }
    lines
}

/// writes a synthetic log to `path`
pub fn write_log(path: &Path, params: &SynthParams) -> std::io::Result<()> {
    let mut log = File::create(path)?;
    let mut file_string = generate_lines(params).join("\n");
    file_string.push('\n');
    log.write_all(file_string.as_bytes())?;
    Ok(())
}
