//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Running / Interrupted / Drained state of a crawl run
//! - `RunToken`: Per-execution identifier namespacing output files
//! - `flush_state` / `load_ids`: Flat-file persistence of the visited set and frontier

mod crawl_state;
mod persist;
mod run;

// Re-export main types
pub use crawl_state::CrawlState;
pub use persist::{flush_state, frontier_path, load_ids, visited_path, FlushedFiles, StateError};
pub use run::RunToken;
