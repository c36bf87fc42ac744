//! CSV results file
//!
//! Rows are appended without a header so that a results file can be extended
//! across several runs, and each row is flushed immediately so an interrupted
//! crawl loses nothing that was already fetched.

use crate::output::traits::{RecordSink, SinkResult};
use crate::output::ResultRecord;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Appends result records to a CSV file
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Opens (creating if needed) a results file in append mode
    pub fn open(path: &Path) -> SinkResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &ResultRecord) -> SinkResult<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}
