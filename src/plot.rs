//! # Renderer
//!
//! Draws the orbit trajectories with gnuplot. The curves are written to a data file, a script is
//! generated next to it and gnuplot renders the PNG from inside the output directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use nalgebra::Vector3;

use crate::error::{EvoError, Result};
use crate::projector::OrbitTrajectories;

/// every curve is cut into roughly this many pieces so older parts can fade out
pub const SEGMENTS: usize = 50;

/// gnuplot colors of a1, a2, a3 and ω
pub const COLORS: [u32; 4] = [0x00FFFF, 0xFF00FF, 0x0000FF, 0x000000];
pub const LABELS: [&str; 4] = ["â_1", "â_2", "â_3", "\u{3C9}\u{302}"];
pub const TITLE: &str = "Time evolution of particle rotation";

/// One piece of every curve, `start..end` into the trajectories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub alpha: f64,
}

/// Cuts `n` points into overlapping segments. Neighbouring segments share one point so the curve
/// stays connected, and the opacity grows logarithmically with the starting index.
pub fn segments(n: usize) -> Vec<Segment> {
    let stride = (n / SEGMENTS).max(1);
    let denominator = (2.0 * n as f64).log10();
    (0..n.saturating_sub(1)).step_by(stride)
        .map(|start| Segment {
            start,
            end: (start + stride + 1).min(n),
            alpha: 0.25 + 0.5 * ((start + 1) as f64).log10() / denominator,
        })
        .collect()
}

/// `#AARRGGBB` where gnuplot reads `AA` as transparency
fn color_spec(rgb: u32, alpha: f64) -> String {
    let transparency = ((1.0 - alpha.max(0.0).min(1.0)) * 255.0).round() as u32;
    format!("#{:02X}{:06X}", transparency, rgb)
}

/// gnuplot single quoted string, a quote is escaped by doubling it
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// writes one data block per segment, blocks are separated by two blank lines so gnuplot can
/// address them with `index`. Every row holds the 12 coordinates of a1, a2, a3 and ω.
pub fn write_data(path: &Path, trajectories: &OrbitTrajectories, segments: &[Segment])
    -> std::io::Result<()> {
    let mut data = File::create(path)?;
    let mut file_string = String::with_capacity(trajectories.len() * 250);
    let curves = trajectories.curves();

    for segment in segments {
        for i in segment.start..segment.end {
            let mut columns = curves.iter().map(|curve| {
                let p: &Vector3<f64> = &curve[i];
                format!("{} {} {}", p.x, p.y, p.z)
            });
            if let Some(first) = columns.next() {
                file_string.push_str(&first);
            }
            for column in columns {
                file_string.push(' ');
                file_string.push_str(&column);
            }
            file_string.push('\n');
        }
        file_string.push_str("\n\n");
    }
    data.write_all(file_string.as_bytes())?;
    Ok(())
}

/// Builds the gnuplot script drawing `data_file` into `png_file`
pub fn render_script(trajectories: &OrbitTrajectories, segments: &[Segment], data_file: &str,
                     png_file: &str) -> String {
    let k = trajectories.reference_vector;
    let mut script = format!(
        "set terminal pngcairo enhanced font \"arial,10\" fontscale 1.0 size 1200, 1200
set output {}
set title \"{}\" font \"arial Bold,24\"
set view equal xyz
set xrange [-1:1]
set yrange [-1:1]
set zrange [-1:1]
set format x \"\"
set format y \"\"
set format z \"\"
set key top right font \"arial,24\"
set arrow 1 from 0,0,0 to {},{},{} lw 3 lc rgb \"black\" filled front
",
        quote(png_file), TITLE, k.x, k.y, k.z);

    let mut clauses = Vec::with_capacity(segments.len() * COLORS.len());
    for (s, segment) in segments.iter().enumerate() {
        // the most opaque piece of every curve carries its legend entry
        let last = s + 1 == segments.len();
        for (c, (&rgb, label)) in COLORS.iter().zip(LABELS.iter()).enumerate() {
            let title = if last { format!("title \"{}\"", label) } else { "notitle".to_string() };
            clauses.push(format!(
                "{} index {} using {}:{}:{} with lines lw 2 lc rgb \"{}\" {}",
                quote(data_file), s, 3 * c + 1, 3 * c + 2, 3 * c + 3,
                color_spec(rgb, segment.alpha), title));
        }
    }

    if clauses.is_empty() {
        // nothing to draw but the arrow, gnuplot still needs something to splot
        script.push_str("splot NaN notitle\n");
    } else {
        script.push_str("splot ");
        script.push_str(&clauses.join(", \\\n    "));
        script.push('\n');
    }
    script
}

/// Renders `<output_dir>/<base_name>.png` and returns its path.
/// The script and data files are removed afterwards unless `keep_files` is set.
pub fn plot_orbit(trajectories: &OrbitTrajectories, output_dir: &Path, base_name: &str,
                  keep_files: bool) -> Result<PathBuf> {
    let io_error = |what: &str, e: std::io::Error| EvoError::Render(format!("{}: {}", what, e));

    let data_file = format!("{}.dat", base_name);
    let script_file = format!("{}.gp", base_name);
    let png_file = format!("{}.png", base_name);

    let segments = segments(trajectories.len());
    debug!("plotting {} points in {} segments", trajectories.len(), segments.len());

    write_data(&output_dir.join(&data_file), trajectories, &segments)
        .map_err(|e| io_error("could not write plot data", e))?;
    let script = render_script(trajectories, &segments, &data_file, &png_file);
    fs::write(output_dir.join(&script_file), script)
        .map_err(|e| io_error("could not write gnuplot script", e))?;

    let status = Command::new("gnuplot")
        .arg(&script_file)
        .current_dir(output_dir)
        .status()
        .map_err(|e| io_error("failed to run gnuplot (is gnuplot installed?)", e))?;
    if !status.success() {
        return Err(EvoError::Render(format!("gnuplot exited with {}", status)));
    }

    if !keep_files {
        for file in &[&data_file, &script_file] {
            fs::remove_file(output_dir.join(file))
                .map_err(|e| io_error("could not remove plot intermediate", e))?;
        }
    }

    let png = output_dir.join(&png_file);
    info!("wrote {}", png.display());
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectories(n: usize) -> OrbitTrajectories {
        let points: Vec<Vector3<f64>> =
            (0..n).map(|i| Vector3::new(i as f64, 0.5, -1.0)).collect();
        OrbitTrajectories {
            axis1: points.clone(),
            axis2: points.clone(),
            axis3: points.clone(),
            angular_velocity: points,
            reference_vector: Vector3::new(0.0, 0.0, 1.25),
        }
    }

    #[test]
    fn test_segments_large() {
        let segs = segments(1000);
        assert_eq!(segs.len(), 50);
        assert_eq!(segs[0], Segment { start: 0, end: 21, alpha: 0.25 });
        assert_eq!(segs[1].start, 20);
        assert_eq!(segs[49].end, 1000);
        assert!(segs.windows(2).all(|w| w[1].alpha > w[0].alpha));
        assert!(segs.iter().all(|s| s.alpha >= 0.25 && s.alpha < 0.75));
    }

    #[test]
    fn test_segments_small_do_not_stall() {
        let segs = segments(18);
        assert_eq!(segs.len(), 17);
        assert_eq!(segs[16], Segment { start: 16, end: 18, alpha: segs[16].alpha });
        assert!(segments(1).is_empty());
        assert!(segments(0).is_empty());
    }

    #[test]
    fn test_color_spec() {
        assert_eq!(color_spec(0x00FFFF, 1.0), "#0000FFFF");
        assert_eq!(color_spec(0x000000, 0.25), "#BF000000");
        assert_eq!(color_spec(0xFF00FF, 0.0), "#FFFF00FF");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("Qt.png"), "'Qt.png'");
        assert_eq!(quote("it's"), "'it''s'");
    }

    #[test]
    fn test_render_script() {
        let traj = trajectories(3);
        let segs = segments(3);
        let script = render_script(&traj, &segs, "Qt.dat", "Qt.png");
        assert!(script.contains("set output 'Qt.png'"));
        assert!(script.contains("to 0,0,1.25"));
        assert!(script.contains(TITLE));
        // two segments times four curves
        assert_eq!(script.matches("'Qt.dat' index").count(), 8);
        assert!(script.contains("index 1 using 10:11:12"));
        assert!(script.contains("title \"ω\u{302}\""));
        assert_eq!(script.matches("\" title \"").count(), 4);
    }

    #[test]
    fn test_render_script_without_points() {
        let script = render_script(&trajectories(0), &[], "Qt.dat", "Qt.png");
        assert!(script.contains("splot NaN notitle"));
    }

    #[test]
    fn test_write_data_blocks() {
        let traj = trajectories(3);
        let segs = segments(3);
        let path = std::env::temp_dir().join(format!("rotation_evo_plot_{}.dat", std::process::id()));
        write_data(&path, &traj, &segs).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let blocks: Vec<&str> = text.trim_end().split("\n\n\n").collect();
        assert_eq!(blocks.len(), 2);
        let first: Vec<&str> = blocks[0].lines().collect();
        assert_eq!(first, vec!["0 0.5 -1 0 0.5 -1 0 0.5 -1 0 0.5 -1",
                               "1 0.5 -1 1 0.5 -1 1 0.5 -1 1 0.5 -1"]);
        assert_eq!(blocks[1].lines().count(), 2);
    }
}
