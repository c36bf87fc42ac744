//! Crawler module for walking the Drive link graph
//!
//! This module contains the core crawling logic, including:
//! - The frontier of IDs still to fetch and the set already visited
//! - The cooperative shutdown signal checked between iterations
//! - Overall crawl coordination and the final state flush

mod coordinator;
mod frontier;
mod shutdown;

pub use coordinator::{CrawlReport, Crawler};
pub use frontier::{Frontier, VisitedSet};
pub use shutdown::ShutdownSignal;

use crate::config::Config;
use crate::drive::DriveFetcher;
use crate::output::{results_path, CsvSink};
use crate::state::RunToken;
use crate::ChaserError;
use std::path::Path;

/// Runs a complete crawl against the Google APIs
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the Drive fetcher from the configuration
/// 2. Create the output directory and open the per-run results CSV in it
/// 3. Seed the frontier and visited set
/// 4. Crawl until drained or interrupted
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - Drive IDs to start from
/// * `previous_frontier` - Frontier of an earlier run, if resuming
/// * `visited` - Visited set of an earlier run, if resuming
/// * `shutdown` - Signal requesting a graceful stop
pub async fn crawl(
    config: &Config,
    seeds: Vec<String>,
    previous_frontier: Vec<String>,
    visited: Vec<String>,
    shutdown: ShutdownSignal,
) -> Result<CrawlReport, ChaserError> {
    let run = RunToken::generate();
    let directory = Path::new(&config.output.directory);
    std::fs::create_dir_all(directory)?;

    let fetcher = DriveFetcher::new(config)?;
    let sink = CsvSink::open(&results_path(directory, &run))?;
    tracing::info!("Appending all crawled Drive files to {}", sink.path().display());

    let order = config.crawler.insertion_order;
    let mut crawler = Crawler::new(fetcher, sink, run, order, directory)
        .with_shutdown(shutdown)
        .seed(seeds, previous_frontier, visited);

    crawler.run().await
}
