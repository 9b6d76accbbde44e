//! # Orbit Projector
//!
//! Expresses the rotated reference frame of every record as three scaled body axes.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use crate::decoder::SimulationRecord;
use crate::loader::ReferenceFrame;
use crate::schema::AXIS_SCALES;

/// The curves handed to the renderer
///
/// # Fields
///
/// * `axis1`, `axis2`, `axis3` - rows of `R·Qᵗ` scaled by 0.25, 0.5 and 1.0, one entry per record
/// * `angular_velocity` - the display angular velocity of every record
/// * `reference_vector` - `k` from the header
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitTrajectories {
    pub axis1: Vec<Vector3<f64>>,
    pub axis2: Vec<Vector3<f64>>,
    pub axis3: Vec<Vector3<f64>>,
    pub angular_velocity: Vec<Vector3<f64>>,
    pub reference_vector: Vector3<f64>,
}

/// Scaled rows of `rotation · Qᵗ`
pub fn project_rotation(rotation: &Matrix3<f64>, reference_matrix: &Matrix3<f64>)
    -> [Vector3<f64>; 3] {
    let rq = rotation * reference_matrix.transpose();
    let mut axes = [Vector3::zeros(); 3];
    for (i, axis) in axes.iter_mut().enumerate() {
        *axis = rq.row(i).transpose() * AXIS_SCALES[i];
    }
    axes
}

/// Projects every record, preserving order and length
pub fn project(records: &[SimulationRecord], frame: &ReferenceFrame) -> OrbitTrajectories {
    let n = records.len();
    let mut trajectories = OrbitTrajectories {
        axis1: Vec::with_capacity(n),
        axis2: Vec::with_capacity(n),
        axis3: Vec::with_capacity(n),
        angular_velocity: Vec::with_capacity(n),
        reference_vector: frame.reference_vector,
    };
    for record in records {
        let [a1, a2, a3] = project_rotation(&record.rotation, &frame.reference_matrix);
        trajectories.axis1.push(a1);
        trajectories.axis2.push(a2);
        trajectories.axis3.push(a3);
        trajectories.angular_velocity.push(record.angular_velocity);
    }
    trajectories
}

impl OrbitTrajectories {
    pub fn len(&self) -> usize {
        self.axis1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis1.is_empty()
    }

    /// The four plotted curves in drawing order: a1, a2, a3, ω
    pub fn curves(&self) -> [&[Vector3<f64>]; 4] {
        [&self.axis1[..], &self.axis2[..], &self.axis3[..], &self.angular_velocity[..]]
    }

    /// generates a csv file at the specified path with one row per record, so the curves can be
    /// replotted with other tools. The first row holds the column names.
    pub fn to_csv(&self, path: &Path) -> std::io::Result<()> {
        let mut csv = File::create(path)?;
        let mut file_string = String::with_capacity(self.len() * 200 + 64);

        file_string.push_str("index,a1_x,a1_y,a1_z,a2_x,a2_y,a2_z,a3_x,a3_y,a3_z,w_x,w_y,w_z\n");
        for i in 0..self.len() {
            file_string.push_str(&format!("{}", i));
            for curve in self.curves().iter() {
                let p = curve[i];
                file_string.push_str(&format!(",{},{},{}", p.x, p.y, p.z));
            }
            file_string.push('\n');
        }
        csv.write_all(file_string.as_bytes())?;
        Ok(())
    }
}
