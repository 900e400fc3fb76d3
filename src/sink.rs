//! Output sink module
//!
//! Receives finalized revision records for formatting. The CSV sink writes
//! the classic nine-field report: one header line, then one unquoted
//! comma-separated record per emitted revision.

use std::io::{self, Write};

use crate::error::Result;
use crate::record::RevisionRecord;

/// CSV header naming the nine report fields
const CSV_HEADER: &str = "revision,username,datetime,files_modified,files_added,files_deleted,lines_modified,lines_added,lines_deleted";

/// Receiver of emitted revision records
pub trait Sink {
    /// Hand one finalized record to the sink
    fn emit(&mut self, record: &RevisionRecord) -> Result<()>;
}

/// Sink that renders records as comma-separated lines
///
/// No quoting or escaping of fields is performed; fields are written as they
/// appeared in the log.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    /// Create a sink writing to the given writer
    pub fn new(writer: W) -> Self {
        CsvSink { writer }
    }

    /// Write the header line
    ///
    /// Called once before the stream is processed; the header appears even
    /// when no revision follows.
    pub fn write_header(&mut self) -> Result<()> {
        self.write_line(format_args!("{CSV_HEADER}"))
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write one line, absorbing broken-pipe errors as success so that a
    /// terminated downstream consumer does not abort the run
    fn write_line(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        match self.writer.write_fmt(format_args!("{args}\n")) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl<W: Write> Sink for CsvSink<W> {
    fn emit(&mut self, record: &RevisionRecord) -> Result<()> {
        self.write_line(format_args!(
            "{},{},{},{},{},{},{},{},{}",
            record.revision,
            record.author,
            record.timestamp,
            record.files.modified,
            record.files.added,
            record.files.deleted,
            record.lines.modified,
            record.lines.added,
            record.lines.deleted,
        ))
    }
}

/// Sink that keeps emitted records in memory for inspection
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<RevisionRecord>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Sink for RecordingSink {
    fn emit(&mut self, record: &RevisionRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
