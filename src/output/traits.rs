//! Result sink trait and error types

use crate::output::ResultRecord;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for result records
///
/// A failed write is fatal to the crawl: the results file is the only record of
/// what was visited.
pub trait RecordSink {
    /// Appends one record
    fn append(&mut self, record: &ResultRecord) -> SinkResult<()>;
}

/// Sink that keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ResultRecord>,
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &ResultRecord) -> SinkResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
