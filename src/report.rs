//! Where the timings end up: a table on the console and rows appended to a
//! CSV file that accumulates across runs.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::bench::Measurement;

pub const DEFAULT_ANALYSIS_PATH: &str = "analysis.txt";
pub const CSV_HEADER: &str = "Operation,Dataset Type,Number of Lines,Time (ms)";

const RULE: &str = "-------------------------------------------";

/// Prints the heading of the console table.
pub fn write_console_header(out: &mut impl Write, lines: usize) -> io::Result<()> {
    writeln!(out, "\nResults for {lines} lines:")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:<12} {:<12} {:<10}", "Operation", "Dataset", "Time (ms)")?;
    writeln!(out, "{RULE}")
}

pub fn write_console_row(out: &mut impl Write, measurement: &Measurement) -> io::Result<()> {
    writeln!(
        out,
        "{:<12} {:<12} {:<10.2}",
        measurement.operation.to_string(),
        measurement.ordering.to_string(),
        measurement.millis()
    )
}

pub fn csv_row(measurement: &Measurement) -> String {
    format!(
        "{},{},{},{:.2}",
        measurement.operation,
        measurement.ordering,
        measurement.lines,
        measurement.millis()
    )
}

/// The CSV file measurements are appended to.
pub struct AnalysisFile<W: Write = File> {
    out: BufWriter<W>,
}

impl AnalysisFile<File> {
    /// Opens `path` for appending. The header only goes in when the file is
    /// created here.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let existed = path.as_ref().exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Self::new(file, !existed)
    }
}

impl<W: Write> AnalysisFile<W> {
    pub fn new(out: W, with_header: bool) -> io::Result<Self> {
        let mut out = BufWriter::new(out);
        if with_header {
            writeln!(out, "{CSV_HEADER}")?;
        }

        Ok(Self { out })
    }

    pub fn append(&mut self, measurement: &Measurement) -> io::Result<()> {
        writeln!(self.out, "{}", csv_row(measurement))
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        self.out.into_inner().map_err(|err| err.into_error())
    }
}
