//! Crawl loop
//!
//! The crawler pops one ID at a time, fetches it, records it and queues every
//! Drive ID found in its body. Fetches are strictly sequential.
//!
//! Both normal completion and a requested shutdown end with the same
//! persistence flush. An expired token or a failing results sink stops the crawl
//! immediately, after a best-effort flush.

use crate::config::InsertionOrder;
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::crawler::shutdown::ShutdownSignal;
use crate::drive::{FetchError, ObjectFetcher};
use crate::links::Resolver;
use crate::output::{RecordSink, ResultRecord};
use crate::state::{flush_state, CrawlState, FlushedFiles, RunToken};
use crate::ChaserError;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Drained or Interrupted
    pub state: CrawlState,
    pub run: RunToken,
    /// Files recorded in the results sink
    pub fetched: usize,
    /// IDs that could not be fetched
    pub skipped: usize,
    pub visited: usize,
    pub remaining: usize,
    /// State files written by the final flush
    pub flushed: FlushedFiles,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock time from the start of the run to the final flush
    pub fn elapsed(&self) -> Duration {
        self.finished_at - self.run.started_at()
    }
}

/// Drive crawler over an [`ObjectFetcher`] and a [`RecordSink`]
pub struct Crawler<F, S> {
    fetcher: F,
    sink: S,
    resolver: Resolver,
    frontier: Frontier,
    visited: VisitedSet,
    state: CrawlState,
    run: RunToken,
    state_directory: PathBuf,
    shutdown: ShutdownSignal,
    fetched: usize,
    skipped: usize,
}

impl<F, S> Crawler<F, S>
where
    F: ObjectFetcher,
    S: RecordSink,
{
    /// Creates a crawler with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of Drive files
    /// * `sink` - Destination of result records
    /// * `run` - Token namespacing the state files
    /// * `order` - Where newly discovered IDs are queued
    /// * `state_directory` - Directory receiving the state files
    pub fn new(
        fetcher: F,
        sink: S,
        run: RunToken,
        order: InsertionOrder,
        state_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            sink,
            resolver: Resolver::default(),
            frontier: Frontier::new(order),
            visited: VisitedSet::new(),
            state: CrawlState::Running,
            run,
            state_directory: state_directory.into(),
            shutdown: ShutdownSignal::new(),
            fetched: 0,
            skipped: 0,
        }
    }

    /// Uses an externally controlled shutdown signal
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Seeds the crawl
    ///
    /// The frontier becomes the previous frontier followed by the seeds, without
    /// duplicates. IDs already visited never enter the frontier.
    pub fn seed(
        mut self,
        seeds: Vec<String>,
        previous_frontier: Vec<String>,
        visited: Vec<String>,
    ) -> Self {
        for id in visited {
            self.visited.insert(id);
        }

        let order = self.frontier.order();
        let visited = &self.visited;
        let candidates = self
            .frontier
            .to_vec()
            .into_iter()
            .chain(previous_frontier)
            .chain(seeds)
            .filter(|id| !visited.contains(id));
        self.frontier = Frontier::from_ids(candidates, order);

        tracing::debug!(
            "Seeded crawl with {} queued and {} already-crawled ID(s)",
            self.frontier.len(),
            self.visited.len()
        );
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn run_token(&self) -> &RunToken {
        &self.run
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the crawl until the frontier drains or shutdown is requested
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Drained or Interrupted, with state flushed
    /// * `Err(ChaserError::AuthExpired)` - The access token was rejected
    /// * `Err(ChaserError::Sink)` - A result record could not be written
    /// * `Err(ChaserError::State)` - The final flush failed
    pub async fn run(&mut self) -> Result<CrawlReport, ChaserError> {
        tracing::info!(
            "Starting crawl run {} at {}",
            self.run,
            self.run.started_at().to_rfc3339()
        );

        while self.state == CrawlState::Running {
            if self.shutdown.is_triggered() {
                let reason = self.shutdown.reason().unwrap_or_default();
                tracing::info!("Shutdown requested ({}), flushing crawl state", reason);
                self.transition(CrawlState::Interrupted);
                break;
            }

            let Some(id) = self.frontier.pop() else {
                tracing::info!("Crawl exhausted all items in the queue");
                self.transition(CrawlState::Drained);
                break;
            };

            tracing::info!(
                "Crawling Drive file {}, queue has {} file(s) with {} already crawled",
                id,
                self.frontier.len(),
                self.visited.len()
            );

            self.process(id).await?;
        }

        let flushed = flush_state(
            &self.state_directory,
            &self.run,
            &self.visited.to_vec(),
            &self.frontier.to_vec(),
        )?;

        Ok(CrawlReport {
            state: self.state,
            run: self.run.clone(),
            fetched: self.fetched,
            skipped: self.skipped,
            visited: self.visited.len(),
            remaining: self.frontier.len(),
            flushed,
            finished_at: Utc::now(),
        })
    }

    /// Fetches, records and expands a single ID
    async fn process(&mut self, id: String) -> Result<(), ChaserError> {
        let object = match self.fetcher.fetch(&id).await {
            Ok(object) => object,
            Err(e) if e.is_fatal() => {
                tracing::error!("Access token rejected while fetching {}", id);
                // The ID was never processed, so it goes back to the queue
                self.frontier.insert(id);
                self.flush_best_effort();
                return Err(ChaserError::AuthExpired);
            }
            Err(FetchError::Unavailable { status }) => {
                tracing::debug!(
                    "Drive file {} is not accessible (HTTP {}), skipping",
                    id,
                    status
                );
                self.skip(id);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Failed to fetch Drive file {}: {}", id, e);
                self.skip(id);
                return Ok(());
            }
        };

        let appended = self.sink.append(&ResultRecord::from_metadata(&object.metadata));
        self.visited.insert(id.clone());
        if let Err(e) = appended {
            tracing::error!("Failed to write result for {}: {}", id, e);
            self.flush_best_effort();
            return Err(e.into());
        }
        self.fetched += 1;

        let links = object.links();
        let mut queued = 0;
        for found in self.resolver.resolve_ids(&links) {
            if self.visited.contains(&found) || self.frontier.contains(&found) {
                continue;
            }
            tracing::trace!("Queueing Drive file {} found in {}", found, id);
            self.frontier.insert(found);
            queued += 1;
        }

        tracing::debug!(
            "Drive file {} ({:?}) yielded {} link(s), {} new ID(s)",
            id,
            object.kind(),
            links.len(),
            queued
        );
        Ok(())
    }

    fn skip(&mut self, id: String) {
        self.visited.insert(id);
        self.skipped += 1;
    }

    fn transition(&mut self, target: CrawlState) {
        if self.state.can_transition_to(target) {
            tracing::debug!("Crawl state {} -> {}", self.state, target);
            self.state = target;
        }
    }

    /// Flushes state on a fatal path, logging instead of failing
    fn flush_best_effort(&self) {
        if let Err(e) = flush_state(
            &self.state_directory,
            &self.run,
            &self.visited.to_vec(),
            &self.frontier.to_vec(),
        ) {
            tracing::warn!("Failed to flush crawl state: {}", e);
        }
    }
}
