//! # Log Loader
//!
//! Reads the fixed header of a simulation log and the trailing window of record lines in a single
//! pass over the file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::{EvoError, Result};
use crate::schema;

/// The frame every record's rotation is composed against
///
/// # Fields
///
/// * `reference_vector` - `k` from the header, already scaled for display
/// * `reference_matrix` - `Q` from the header
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    pub reference_vector: Vector3<f64>,
    pub reference_matrix: Matrix3<f64>,
}

/// The raw record lines at the end of a log
///
/// # Fields
///
/// * `path` - file the lines came from, kept for error messages
/// * `first_line` - 1-based line number of `lines[0]`
/// * `total_lines` - line count of the whole file
/// * `lines` - the record lines in file order
#[derive(Debug, Clone)]
pub struct LogWindow {
    pub path: PathBuf,
    pub first_line: usize,
    pub total_lines: usize,
    pub lines: Vec<String>,
}

impl LogWindow {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// iterates over `(line number, text)` pairs
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().map(move |(i, l)| (self.first_line + i, l.as_str()))
    }
}

/// Opens `path`, parses the header and keeps the last `min(total - 22, 24000)` lines.
/// The file is closed before this returns, on success and on every error.
pub fn load(path: &Path) -> Result<(ReferenceFrame, LogWindow)> {
    let access = |source| EvoError::FileAccess { path: path.to_path_buf(), source };
    let reader = BufReader::new(File::open(path).map_err(access)?);

    // the tail is bounded by the cap, the header by its fixed length
    // lines stay raw bytes, only the ones actually parsed are decoded as text
    let mut header: Vec<Vec<u8>> = Vec::with_capacity(schema::REFERENCE_MATRIX_LINES.end);
    let mut tail: VecDeque<Vec<u8>> = VecDeque::new();
    let mut total_lines = 0;
    for line in reader.split(b'\n') {
        let mut line = line.map_err(access)?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        total_lines += 1;
        if header.len() < schema::REFERENCE_MATRIX_LINES.end {
            header.push(line.clone());
        }
        if tail.len() == schema::MAX_RECORDS {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    let window = schema::window_len(total_lines).ok_or_else(|| EvoError::InsufficientData {
        path: path.to_path_buf(),
        total_lines,
        header_lines: schema::HEADER_LINES,
    })?;
    let header: Vec<String> = header.iter().map(|l| text(l)).collect();
    let frame = parse_header(path, &header)?;

    let skip = tail.len() - window;
    let lines: Vec<String> = tail.iter().skip(skip).map(|l| text(l)).collect();
    let first_line = total_lines - window + 1;
    debug!("{}: {} lines, keeping records {}..={}", path.display(), total_lines, first_line,
           total_lines);

    Ok((frame, LogWindow { path: path.to_path_buf(), first_line, total_lines, lines }))
}

/// Bytes that are not UTF-8 become U+FFFD, so they only matter if a number has to be read from them
fn text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

/// Parses `k` and `Q` out of the first lines of a log
pub fn parse_header(path: &Path, header: &[String]) -> Result<ReferenceFrame> {
    let malformed = |index: usize, reason: String| EvoError::MalformedHeader {
        path: path.to_path_buf(),
        line: index + 1,
        reason,
    };
    let line_at = |index: usize| {
        header.get(index).map(String::as_str)
            .ok_or_else(|| malformed(index, "line is missing".to_string()))
    };

    let k_line = schema::REFERENCE_VECTOR_LINE;
    let tokens: Vec<&str> = line_at(k_line)?.split_whitespace().collect();
    let range = schema::REFERENCE_VECTOR_TOKENS;
    if tokens.len() < range.end {
        return Err(malformed(k_line, format!(
            "expected at least {} tokens for the reference vector, found {}",
            range.end, tokens.len())));
    }
    let k = parse_numbers(&tokens[range]).map_err(|r| malformed(k_line, r))?;
    let reference_vector = Vector3::new(k[0], k[1], k[2]) * schema::REFERENCE_VECTOR_SCALE;

    let mut rows = Vec::with_capacity(9);
    for index in schema::REFERENCE_MATRIX_LINES {
        let tokens: Vec<&str> = line_at(index)?.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(malformed(index, format!(
                "expected 3 reference matrix columns, found {}", tokens.len())));
        }
        rows.extend(parse_numbers(&tokens).map_err(|r| malformed(index, r))?);
    }
    let reference_matrix = Matrix3::from_row_slice(&rows);

    Ok(ReferenceFrame { reference_vector, reference_matrix })
}

/// Parses every token as `f64`, the error names the first token that is not a number
pub(crate) fn parse_numbers(tokens: &[&str]) -> std::result::Result<Vec<f64>, String> {
    tokens.iter()
        .map(|t| t.parse::<f64>().map_err(|_| format!("`{}` is not a number", t)))
        .collect()
}
