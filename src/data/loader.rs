use std::io::{self, BufRead};

use super::model::CustomerRecord;
use super::validate::{validate_line, Diagnostic};
use crate::config::CoordinateBounds;

// ---------------------------------------------------------------------------
// LoadedRecords – outcome of reading a whole source
// ---------------------------------------------------------------------------

/// Accepted records and per-line diagnostics, both in input order.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<CustomerRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of lines seen, rejected ones included.
    pub lines_read: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read every line of `input` and validate it.
///
/// Lines are split on `\n`; a trailing `\r` is dropped. Bad lines are logged
/// and collected as [`Diagnostic`]s. Only an I/O failure of the source itself
/// aborts the load.
pub fn load_records<R: BufRead>(mut input: R, bounds: &CoordinateBounds) -> io::Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        loaded.lines_read += 1;

        match validate_line(trim_line_ending(&buf), loaded.lines_read, bounds) {
            Ok(record) => loaded.records.push(record),
            Err(diag) => {
                log::warn!("Skipping {diag}");
                loaded.diagnostics.push(diag);
            }
        }
    }

    Ok(loaded)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
