//! Flat-file persistence of crawl state
//!
//! At the end of a run (drained or interrupted) the visited set and the frontier
//! are written as JSON arrays of IDs. Operators can feed them back into a later
//! `crawl --visited .. --queue ..` to resume by hand.

use crate::state::RunToken;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving or loading crawl state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid state file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Paths written by a persistence flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushedFiles {
    /// Visited set file, if it was written
    pub visited: Option<PathBuf>,
    /// Frontier file, if it was written
    pub frontier: Option<PathBuf>,
}

/// Path of the visited-set file for a run
pub fn visited_path(directory: &Path, run: &RunToken) -> PathBuf {
    directory.join(format!("crawled-ids-{}.json", run))
}

/// Path of the remaining-frontier file for a run
pub fn frontier_path(directory: &Path, run: &RunToken) -> PathBuf {
    directory.join(format!("crawl_remaining_queue-{}.json", run))
}

/// Writes the visited set and frontier to their run files
///
/// An empty collection is not written. Each file is written with a single call.
pub fn flush_state(
    directory: &Path,
    run: &RunToken,
    visited: &[String],
    frontier: &[String],
) -> Result<FlushedFiles, StateError> {
    let mut flushed = FlushedFiles::default();

    if !visited.is_empty() {
        let path = visited_path(directory, run);
        write_ids(&path, visited)?;
        tracing::info!("Flushed {} already-crawled ID(s) to {}", visited.len(), path.display());
        flushed.visited = Some(path);
    }

    if !frontier.is_empty() {
        let path = frontier_path(directory, run);
        write_ids(&path, frontier)?;
        tracing::info!("Flushed {} queued ID(s) to {}", frontier.len(), path.display());
        flushed.frontier = Some(path);
    }

    Ok(flushed)
}

fn write_ids(path: &Path, ids: &[String]) -> Result<(), StateError> {
    let json = serde_json::to_string(ids).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a JSON array of IDs written by [`flush_state`]
pub fn load_ids(path: &Path) -> Result<Vec<String>, StateError> {
    let content = std::fs::read_to_string(path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })
}
