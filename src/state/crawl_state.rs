/// Crawl state definitions
///
/// A crawl starts `Running` and ends either `Drained` (frontier exhausted) or
/// `Interrupted` (shutdown requested). Fatal errors end the crawl without a
/// final state; they surface as errors instead.
use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Popping and fetching IDs from the frontier
    Running,

    /// Shutdown was requested; state is flushed and the run stops
    Interrupted,

    /// The frontier is empty; the crawl is complete
    Drained,
}

impl CrawlState {
    /// Returns true if this is a terminal state (no further processing happens)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Checks if a transition from this state to another is valid
    pub fn can_transition_to(&self, target: CrawlState) -> bool {
        matches!(
            (self, target),
            (Self::Running, Self::Interrupted) | (Self::Running, Self::Drained)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Interrupted => "interrupted",
            Self::Drained => "drained",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
