//! # Log layout
//!
//! The simulation log is not self describing. Every position the parser relies on lives here so
//! the whole contract with the log producer can be read (and tested) in one place.
//! Line indices are 0-based, `*_LINE_NO` values are the 1-based numbers used in messages.

use std::ops::Range;

/// line holding the reference vector `k`
pub const REFERENCE_VECTOR_LINE: usize = 1;
/// whitespace token range of `k` on that line
pub const REFERENCE_VECTOR_TOKENS: Range<usize> = 2..5;
/// `k` is stretched so the arrow sticks out of the unit sphere
pub const REFERENCE_VECTOR_SCALE: f64 = 1.25;

/// lines holding the rows of the reference matrix `Q`
pub const REFERENCE_MATRIX_LINES: Range<usize> = 17..20;

/// number of preamble lines that never count as dynamics records
pub const HEADER_LINES: usize = 22;
/// upper bound for the trailing record window
pub const MAX_RECORDS: usize = 24000;

/// separator between record fields
pub const FIELD_DELIMITER: char = '|';
/// a record line has at least this many fields
pub const MIN_FIELDS: usize = 9;

pub const ANGULAR_VELOCITY_FIELD: usize = 3;
pub const ORIENTATION_FIELD: usize = 4;
pub const TIME_FIELD: usize = 7;
pub const ROTATION_FIELD: usize = 8;

/// normalized angular velocity is drawn slightly outside the unit sphere
pub const ANGULAR_VELOCITY_SCALE: f64 = 1.2;
/// column of `R·Q` subtracted from the orientation field
pub const ORIENTATION_COLUMN: usize = 2;

/// per axis scale of the projected body axes
pub const AXIS_SCALES: [f64; 3] = [0.25, 0.5, 1.0];

/// Number of records the loader keeps for a file with `total_lines` lines.
/// `None` if the file is too short to contain a single record.
pub fn window_len(total_lines: usize) -> Option<usize> {
    match total_lines.checked_sub(HEADER_LINES) {
        Some(0) | None => None,
        Some(n) => Some(n.min(MAX_RECORDS)),
    }
}
