use std::fs;
use std::path::PathBuf;

use nalgebra::{Matrix3, Vector3};
use rotation_evo::synth::{self, SynthParams};
use rotation_evo::{decoder, loader, parallel, projector, schema, Config, EvoError};

/// scratch file in the system temp dir, unique per test and process
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rotation_evo_{}_{}", name, std::process::id()))
}

fn header(k: [f64; 3], q: [[f64; 3]; 3]) -> Vec<String> {
    let mut lines = Vec::with_capacity(schema::HEADER_LINES);
    lines.push("rotation run".to_string());
    lines.push(format!("k : {} {} {} end", k[0], k[1], k[2]));
    while lines.len() < 17 {
        lines.push(format!("# parameter {}", lines.len()));
    }
    for row in q.iter() {
        lines.push(format!("  {}  {}  {}", row[0], row[1], row[2]));
    }
    lines.push("# columns".to_string());
    lines.push("#".to_string());
    lines
}

/// record `i` carries time `i` and a rotation about z by `i` hundredths of a radian
fn record(i: usize) -> String {
    let (s, c) = (i as f64 * 0.01).sin_cos();
    format!("{} | x | y | 0 0 {} | 0 0 1 | - | - | {} 0 0 | {} {} 0 {} {} 0 0 0 1",
            i, i, i, c, -s, s, c)
}

fn write(name: &str, lines: &[String]) -> PathBuf {
    let path = scratch(name);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&path, text).unwrap();
    path
}

fn identity() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

#[test]
fn header_round_trip() {
    let q = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    let mut lines = header([2.0, -4.0, 0.5], q);
    lines.push(record(0));
    let path = write("header", &lines);

    let (frame, window) = loader::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(frame.reference_vector, Vector3::new(2.5, -5.0, 0.625));
    assert_eq!(frame.reference_matrix,
               Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0));
    assert_eq!(window.len(), 1);
    assert_eq!(window.first_line, 23);
}

#[test]
fn window_is_capped() {
    let mut lines = header([0.0, 0.0, 1.0], identity());
    lines.extend((0..30000).map(record));
    let path = write("cap", &lines);

    let (frame, window) = loader::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(window.total_lines, 30022);
    assert_eq!(window.len(), schema::MAX_RECORDS);
    assert_eq!(window.first_line, 22 + 6000 + 1);

    let records = decoder::decode_window(&window, &frame).unwrap();
    assert_eq!(records[0].time.x, 6000.0);
    assert_eq!(records[23999].time.x, 29999.0);
}

#[test]
fn degenerate_window_fails() {
    let path = write("degenerate", &header([0.0, 0.0, 1.0], identity()));
    let err = loader::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    match err {
        EvoError::InsufficientData { total_lines, .. } => assert_eq!(total_lines, 22),
        other => panic!("unexpected error {:?}", other),
    }

    let path = write("tiny", &["just".to_string(), "three".to_string(), "lines".to_string()]);
    let err = loader::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, EvoError::InsufficientData { total_lines: 3, .. }));
}

#[test]
fn latin1_bytes_outside_parsed_fields_are_accepted() {
    let mut lines = header([0.0, 0.0, 1.0], identity());
    lines.push(record(0));
    let mut bytes = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        bytes.extend_from_slice(line.as_bytes());
        if i == 5 {
            // a degree sign written by a Latin-1 producer
            bytes.extend_from_slice(b" temperature 20\xB0C");
        }
        bytes.push(b'\n');
    }
    let path = scratch("latin1");
    fs::write(&path, &bytes).unwrap();

    let result = loader::load(&path);
    fs::remove_file(&path).unwrap();
    let (frame, window) = result.unwrap();
    assert_eq!(window.len(), 1);
    let records = decoder::decode_window(&window, &frame).unwrap();
    assert_eq!(records[0].line, 23);
}

#[test]
fn latin1_bytes_in_a_parsed_field_name_the_line() {
    let mut bytes = header([0.0, 0.0, 1.0], identity()).join("\n").into_bytes();
    bytes.push(b'\n');
    bytes.extend_from_slice(record(0).as_bytes());
    bytes.extend_from_slice(b"\r\n0 | x | y | 0 0 1 | 0 0 1 | - | - | 1\xB0 0 0 | 1 0 0 0 1 0 0 0 1\r\n");
    let path = scratch("latin1_record");
    fs::write(&path, &bytes).unwrap();

    let result = loader::load(&path);
    fs::remove_file(&path).unwrap();
    let (frame, window) = result.unwrap();
    assert_eq!(window.len(), 2);
    let err = decoder::decode_window(&window, &frame).unwrap_err();
    assert!(matches!(err, EvoError::MalformedRecord { line: 24, field: 7, .. }));
}

#[test]
fn malformed_header_is_reported() {
    let mut lines = header([0.0, 0.0, 1.0], identity());
    lines[18] = "1 0".to_string();
    lines.push(record(0));
    let path = write("bad_header", &lines);
    let err = loader::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, EvoError::MalformedHeader { line: 19, .. }));
}

#[test]
fn malformed_record_names_the_line() {
    let mut lines = header([0.0, 0.0, 1.0], identity());
    lines.extend((0..5).map(record));
    lines[24] = "0 | 1 | 2 | 3".to_string();
    let path = write("bad_record", &lines);

    let (frame, window) = loader::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let err = decoder::decode_window(&window, &frame).unwrap_err();

    assert!(matches!(err, EvoError::MalformedRecord { line: 25, .. }));
    let message = err.to_string();
    assert!(message.contains(":25:"));
    assert!(message.contains("found 4"));
}

#[test]
fn forty_line_log_end_to_end() {
    let mut lines = header([0.0, 0.0, 1.0], identity());
    lines.extend((0..18).map(record));
    assert_eq!(lines.len(), 40);
    let path = write("end_to_end", &lines);

    let trajectories = rotation_evo::trajectories_from_log(&path, 1).unwrap();
    let threaded = rotation_evo::trajectories_from_log(&path, 4).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(trajectories, threaded);
    assert_eq!(trajectories.axis1.len(), 18);
    assert_eq!(trajectories.axis2.len(), 18);
    assert_eq!(trajectories.axis3.len(), 18);
    assert_eq!(trajectories.angular_velocity.len(), 18);
    assert_eq!(trajectories.reference_vector, Vector3::new(0.0, 0.0, 1.25));

    // the first row of a rotation about z by a is (cos a, -sin a, 0)
    for (i, a1) in trajectories.axis1.iter().enumerate() {
        let (s, c) = (i as f64 * 0.01).sin_cos();
        assert!((a1 - Vector3::new(c, -s, 0.0) * 0.25).norm() < 1e-12);
    }
    assert!(trajectories.axis3.iter().all(|a| *a == Vector3::new(0.0, 0.0, 1.0)));

    // record 0 spins with zero angular velocity, every other one about +z
    assert_eq!(trajectories.angular_velocity[0], Vector3::zeros());
    assert!(trajectories.angular_velocity[1..].iter()
        .all(|w| (w - Vector3::new(0.0, 0.0, 1.2)).norm() < 1e-12));
}

#[test]
fn synthetic_log_is_readable() {
    let path = scratch("synth");
    let params = SynthParams { records: 500, seed: Some([7; 32]), ..SynthParams::default() };
    synth::write_log(&path, &params).unwrap();

    let (frame, window) = loader::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(window.len(), 500);
    assert!((frame.reference_vector.norm() - 1.25).abs() < 1e-9);

    let records = parallel::decode_window_parallel(&window, &frame, 3).unwrap();
    assert_eq!(records, decoder::decode_window(&window, &frame).unwrap());
    for record in &records {
        let r = record.rotation;
        assert!((r * r.transpose() - Matrix3::identity()).norm() < 1e-9);
        // the generator only adds a little noise to the orientation
        assert!(record.orientation_offset.amax() <= 0.01 + 1e-9);
    }

    let trajectories = projector::project(&records, &frame);
    assert!(trajectories.axis3.iter().all(|a| (a.norm() - 1.0).abs() < 1e-9));
    assert!(trajectories.axis1.iter().all(|a| (a.norm() - 0.25).abs() < 1e-9));
}

#[test]
fn run_fails_without_log_but_prepares_output_dir() {
    let out = scratch("figs");
    let mut config = Config::new(scratch("missing_log"), &out);
    config.write_csv = true;

    let err = rotation_evo::run(&config).unwrap_err();
    assert!(matches!(err, EvoError::FileAccess { .. }));
    assert!(out.is_dir());
    assert!(!config.figure_path().exists());
    assert!(!config.csv_path().exists());
    fs::remove_dir_all(&out).unwrap();
}
