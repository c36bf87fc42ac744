//! Run tokens
//!
//! Every execution gets a fresh token that namespaces its results and state
//! files, so runs never overwrite each other's output.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Identifies one crawl execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunToken {
    id: String,
    started_at: DateTime<Utc>,
}

impl RunToken {
    /// Generates a new random token
    pub fn generate() -> Self {
        Self::from_string(Uuid::new_v4().to_string())
    }

    /// Wraps an existing token string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: Utc::now(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
