//! # Parallel Decoder
//!
//! splits the record window into contiguous sectors and decodes every sector on its own scoped
//! thread. Sectors are joined back in file order so the result is the same as decoding the window
//! line by line.

use crossbeam_utils::thread;
use log::debug;

use crate::decoder::{decode_line, SimulationRecord};
use crate::error::{EvoError, Result};
use crate::loader::{LogWindow, ReferenceFrame};

/// Sector boundaries as `(start, end)` index pairs covering `0..len` without gaps.
/// Never produces more sectors than there are lines.
pub fn sectors(len: usize, workers: usize) -> Vec<(usize, usize)> {
    let workers = workers.max(1).min(len.max(1));
    let sector_width = len / workers;
    let remainder = len % workers;

    let mut bounds = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        // the first `remainder` sectors take one extra line
        let end = start + sector_width + if i < remainder { 1 } else { 0 };
        bounds.push((start, end));
        start = end;
    }
    bounds
}

/// Decodes the window on `workers` threads. With one worker (or a tiny window) no thread is
/// spawned at all. On failure the error of the earliest malformed line is returned.
pub fn decode_window_parallel(window: &LogWindow, frame: &ReferenceFrame, workers: usize)
    -> Result<Vec<SimulationRecord>> {
    let bounds = sectors(window.len(), workers);
    if bounds.len() <= 1 {
        return decode_sector(window, frame, 0, window.len());
    }
    debug!("decoding {} records in {} sectors", window.len(), bounds.len());

    let results = thread::scope(|scope| {
        let handles: Vec<_> = bounds.iter()
            .map(|&(start, end)| scope.spawn(move |_| decode_sector(window, frame, start, end)))
            .collect();
        handles.into_iter()
            .map(|handle| handle.join().map_err(|_| EvoError::WorkerPanicked))
            .collect::<Vec<_>>()
    }).map_err(|_| EvoError::WorkerPanicked)?;

    let mut records = Vec::with_capacity(window.len());
    for sector in results {
        // sectors are in file order, so the first error is the earliest one
        records.extend(sector??);
    }
    Ok(records)
}

fn decode_sector(window: &LogWindow, frame: &ReferenceFrame, start: usize, end: usize)
    -> Result<Vec<SimulationRecord>> {
    window.lines[start..end].iter().enumerate()
        .map(|(i, text)| decode_line(&window.path, window.first_line + start + i, text, frame))
        .collect()
}
