use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::data::filter::{sort_by_user_id, within_radius, Nearby};
use crate::data::loader::load_records;
use crate::data::validate::Diagnostic;
use crate::data::writer::write_records;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that stop a run. Bad input lines never end up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot open input {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading input")]
    Read(#[source] io::Error),

    #[error("cannot create output {}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing output")]
    Write(#[source] io::Error),

    #[error("cannot read config {}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// What a run did.
#[derive(Debug, Default)]
pub struct RunReport {
    pub lines_read: usize,
    /// Lines that passed validation.
    pub accepted: usize,
    /// Records within the radius, i.e. lines written.
    pub retained: usize,
    /// One entry per rejected line, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn rejected(&self) -> usize {
        self.diagnostics.len()
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Select the customers of `input` within range and write them to `output`.
///
/// ```text
///  input ──► load_records ──► within_radius ──► sort_by_user_id ──► write_records ──► output
///              (validate)        (distance)
/// ```
pub fn run<R, W>(input: R, output: W, config: &PipelineConfig) -> Result<RunReport, PipelineError>
where
    R: BufRead,
    W: Write,
{
    let selection = select(input, config)?;
    write_records(output, selection.iter().map(|n| &n.record)).map_err(PipelineError::Write)?;
    Ok(selection.report)
}

/// [`run`] over files. The output file is only created (and truncated) once
/// the whole input has been read, so a missing input leaves it untouched.
pub fn run_files(
    input_path: &Path,
    output_path: &Path,
    config: &PipelineConfig,
) -> Result<RunReport, PipelineError> {
    let file = File::open(input_path).map_err(|source| PipelineError::SourceUnavailable {
        path: input_path.to_path_buf(),
        source,
    })?;
    let selection = select(BufReader::new(file), config)?;

    let out = File::create(output_path).map_err(|source| PipelineError::SinkUnavailable {
        path: output_path.to_path_buf(),
        source,
    })?;
    write_records(BufWriter::new(out), selection.iter().map(|n| &n.record))
        .map_err(PipelineError::Write)?;

    log::info!("Wrote {} customers to {}", selection.report.retained, output_path.display());
    Ok(selection.report)
}

struct Selection {
    nearby: Vec<Nearby>,
    report: RunReport,
}

impl Selection {
    fn iter(&self) -> impl Iterator<Item = &Nearby> {
        self.nearby.iter()
    }
}

/// Load, validate, filter and sort; everything except writing.
fn select<R: BufRead>(input: R, config: &PipelineConfig) -> Result<Selection, PipelineError> {
    config.validate()?;

    let loaded = load_records(input, &config.bounds).map_err(PipelineError::Read)?;
    let accepted = loaded.records.len();

    let mut nearby = within_radius(
        loaded.records,
        config.reference,
        config.max_distance_km,
        &config.earth,
    );
    sort_by_user_id(&mut nearby);

    let report = RunReport {
        lines_read: loaded.lines_read,
        accepted,
        retained: nearby.len(),
        diagnostics: loaded.diagnostics,
    };
    log::info!(
        "Read {} lines: {} accepted, {} rejected, {} within {} km of {}",
        report.lines_read,
        report.accepted,
        report.rejected(),
        report.retained,
        config.max_distance_km,
        config.reference
    );

    Ok(Selection { nearby, report })
}
