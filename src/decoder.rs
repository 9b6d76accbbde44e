//! # Record Decoder
//!
//! Turns one `|` separated record line into a [`SimulationRecord`].

use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use crate::error::{EvoError, Result};
use crate::loader::{parse_numbers, LogWindow, ReferenceFrame};
use crate::schema;

/// One decoded line of the dynamics record
///
/// # Fields
///
/// * `line` - 1-based line number in the source log
/// * `time` - the three numbers of the time field
/// * `angular_velocity` - unit angular velocity scaled for display, zero if the raw one was zero
/// * `rotation` - particle rotation matrix, read row-major
/// * `orientation_offset` - orientation field minus the third column of `rotation · Q`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    pub line: usize,
    pub time: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub rotation: Matrix3<f64>,
    pub orientation_offset: Vector3<f64>,
}

/// Decodes a single record line. `source` and `line` only end up in error messages.
pub fn decode_line(source: &Path, line: usize, text: &str, frame: &ReferenceFrame)
    -> Result<SimulationRecord> {
    let malformed = |field: usize, reason: String| EvoError::MalformedRecord {
        path: source.to_path_buf(),
        line,
        field,
        reason,
    };

    let fields: Vec<&str> = text.split(schema::FIELD_DELIMITER).collect();
    if fields.len() < schema::MIN_FIELDS {
        return Err(malformed(fields.len(), format!(
            "expected at least {} `{}` separated fields, found {}",
            schema::MIN_FIELDS, schema::FIELD_DELIMITER, fields.len())));
    }

    let numbers = |field: usize, expected: usize| -> Result<Vec<f64>> {
        let tokens: Vec<&str> = fields[field].split_whitespace().collect();
        if tokens.len() != expected {
            return Err(malformed(field, format!(
                "expected {} numbers, found {} tokens", expected, tokens.len())));
        }
        parse_numbers(&tokens).map_err(|reason| malformed(field, reason))
    };
    let vector = |field: usize| -> Result<Vector3<f64>> {
        numbers(field, 3).map(|v| Vector3::from_row_slice(&v))
    };

    let time = vector(schema::TIME_FIELD)?;
    let rotation = Matrix3::from_row_slice(&numbers(schema::ROTATION_FIELD, 9)?);

    let rotated = rotation * frame.reference_matrix;
    let orientation_offset = vector(schema::ORIENTATION_FIELD)?
        - rotated.column(schema::ORIENTATION_COLUMN).into_owned();

    let angular_velocity = display_angular_velocity(&vector(schema::ANGULAR_VELOCITY_FIELD)?);

    Ok(SimulationRecord { line, time, angular_velocity, rotation, orientation_offset })
}

/// Unit vector along `raw` stretched for display, or exactly zero when `raw` is zero
pub fn display_angular_velocity(raw: &Vector3<f64>) -> Vector3<f64> {
    let norm = raw.norm();
    if norm == 0.0 {
        Vector3::zeros()
    } else {
        raw / norm * schema::ANGULAR_VELOCITY_SCALE
    }
}

/// Decodes every line of the window in order, stopping at the first malformed one
pub fn decode_window(window: &LogWindow, frame: &ReferenceFrame) -> Result<Vec<SimulationRecord>> {
    window.numbered()
        .map(|(line, text)| decode_line(&window.path, line, text, frame))
        .collect()
}
