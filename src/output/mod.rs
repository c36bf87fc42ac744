//! Output module for crawl results
//!
//! This module handles:
//! - Building one result record per fetched Drive file
//! - Appending records to the CSV results file
//! - Naming the per-run output files

mod csv_output;
mod record;
mod traits;

pub use csv_output::CsvSink;
pub use record::{ResultRecord, RESULT_COLUMNS};
pub use traits::{MemorySink, RecordSink, SinkError, SinkResult};

use crate::state::RunToken;
use std::path::{Path, PathBuf};

/// Path of the results CSV for a run
pub fn results_path(directory: &Path, run: &RunToken) -> PathBuf {
    directory.join(format!("enumerated-google-drive-files-{}.csv", run))
}
