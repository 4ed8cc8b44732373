//! Collaborator interfaces.
//!
//! The pipeline never reaches for a browser, a language model, or a
//! database directly. Each is injected as one of these traits:
//! - `PageRenderer`: URL to rendered HTML
//! - `Organizer`: cleaned text to a sectioned-document candidate
//! - `JobStore`: job records
//!
//! Implementations must be `Send + Sync`; they are shared across job tasks.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RenderError, Result};
use crate::job::{JobId, JobUpdate, ScrapeJob};

/// Renders a URL into HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `url`, giving up after `timeout`.
    ///
    /// Navigation failures and timeouts must be reported as the matching
    /// [`RenderError`] variant. Any browser session opened for the call is
    /// closed before returning, on every path.
    async fn render(&self, url: &str, timeout: Duration) -> std::result::Result<String, RenderError>;
}

/// Reorganizes cleaned text into sections.
///
/// Returns the model's raw reply; the assembler is responsible for parsing
/// and repairing it. How the organizer picks its prompt (FAQ or general
/// content) is its own business.
#[async_trait]
pub trait Organizer: Send + Sync {
    async fn organize(&self, content: &str, url: &str) -> Result<String>;
}

/// Persistence for job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job and return its id.
    async fn create(&self, job: ScrapeJob) -> Result<JobId>;

    /// Fetch a job by id.
    async fn get(&self, id: JobId) -> Result<Option<ScrapeJob>>;

    /// Apply a partial update and return the updated job.
    ///
    /// Returns `Ok(None)` when no such job exists.
    async fn update(&self, id: JobId, update: JobUpdate) -> Result<Option<ScrapeJob>>;

    /// Most recently created jobs first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<ScrapeJob>>;
}
