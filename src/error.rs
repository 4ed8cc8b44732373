//! Error types for kb-scrape.
//!
//! Every error maps to exactly one pipeline [`Stage`] so a failed job can
//! always say where it broke.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::job::{JobId, JobStatus};

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Submission,
    Render,
    Extraction,
    Organization,
    Persistence,
    Export,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Render => "render",
            Self::Extraction => "extraction",
            Self::Organization => "organization",
            Self::Persistence => "persistence",
            Self::Export => "export",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by the page renderer.
///
/// Navigation failures and timeouts are kept apart so callers can tell a
/// dead URL from a slow one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The browser could not load the page.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// The page did not finish rendering in time.
    #[error("rendering {url} timed out after {}s", after.as_secs())]
    Timeout { url: String, after: Duration },
}

/// Error type for scraping, structuring, and job operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Submission rejected before a job was created.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rendering the page failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The extraction task could not run to completion.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The organizer collaborator failed or timed out.
    #[error("organization failed: {0}")]
    Organization(String),

    /// Export requested on a job that cannot produce it.
    #[error("export rejected: {0}")]
    Export(String),

    /// The job store failed.
    #[error("job store error: {0}")]
    Store(String),

    /// No job with this id exists.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// A write would move a job backwards or out of a terminal state.
    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}

impl Error {
    /// The stage this error is attributed to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidInput(_) => Stage::Submission,
            Self::Render(_) => Stage::Render,
            Self::Extraction(_) => Stage::Extraction,
            Self::Organization(_) => Stage::Organization,
            Self::Export(_) | Self::NotFound(_) => Stage::Export,
            Self::Store(_) | Self::InvalidTransition { .. } => Stage::Persistence,
        }
    }
}

/// Result type alias for kb-scrape operations.
pub type Result<T> = std::result::Result<T, Error>;
