// src/storage/run_log.rs

//! Append-only per-stage CSV log and failure list.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Outcome, RunRecord, Stage};

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Appends a stage's records to `<stage>_log.csv` and failures to
/// `failed_<stage>.txt`.
#[derive(Debug, Clone)]
pub struct RunLog {
    csv_path: PathBuf,
    failure_path: PathBuf,
}

impl RunLog {
    pub fn new(base_dir: &Path, stage: Stage) -> Self {
        Self {
            csv_path: base_dir.join(stage.log_file_name()),
            failure_path: base_dir.join(stage.failure_file_name()),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn failure_path(&self) -> &Path {
        &self.failure_path
    }

    /// Append one record; failures also go to the failure list.
    pub fn append(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.csv_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let is_new = !self.csv_path.exists();
        let mut csv = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;
        if is_new {
            write_row(&mut csv, &RunRecord::CSV_HEADER)?;
        }
        write_row(&mut csv, &record.csv_fields())?;

        if record.outcome == Outcome::Fail {
            let mut failures = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.failure_path)?;
            writeln!(failures, "{}", record.identifier())?;
        }
        Ok(())
    }
}
