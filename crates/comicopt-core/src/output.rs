//! Folder report output in JSON or JSON Lines.
//!
//! Used for the `--report` file of a batch run. JSON writes the whole
//! `BatchSummary` as one document; JSON Lines writes one `FolderReport` per
//! line so reports can be appended as folders finish.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::{BatchSummary, FolderReport};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes folder reports to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    reports_written: usize,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            reports_written: 0,
        }
    }

    /// Write a single folder report as one line.
    pub fn write_report(&mut self, report: &FolderReport) -> io::Result<()> {
        self.write_line(report)?;
        self.reports_written += 1;
        Ok(())
    }

    /// Write a whole batch.
    ///
    /// JSON gets one pretty-printed summary; JSON Lines gets one line per
    /// folder.
    pub fn write_summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, summary)
                    .map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.reports_written += summary.reports.len();
            }
            OutputFormat::JsonLines => {
                for report in &summary.reports {
                    self.write_report(report)?;
                }
            }
        }
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        // A line is never pretty-printed
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)
    }

    /// Get the number of reports written.
    pub fn reports_written(&self) -> usize {
        self.reports_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write `summary` to a new file at `path`, replacing any existing file.
pub fn write_summary_file(
    path: &Path,
    format: OutputFormat,
    summary: &BatchSummary,
) -> io::Result<usize> {
    let file = File::create(path)?;
    let mut writer = OutputWriter::new(BufWriter::new(file), format);
    writer.write_summary(summary)?;
    writer.flush()?;
    Ok(writer.reports_written())
}
