//! Scrape jobs and their state machine.
//!
//! A job moves `pending -> processing -> completed | failed` and nothing
//! else. [`ScrapeJob::apply`] is the single place writes are checked, so a
//! store that routes every update through it cannot move a job backwards or
//! touch a finished one.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::options::{OutputFormat, ProcessingOptions};
use crate::result::StructuredContent;

/// Free-form job metadata.
pub type JobMetadata = serde_json::Map<String, serde_json::Value>;

/// Opaque job identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| Error::InvalidInput(format!("bad job id {s:?}: {e}")))
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `completed` and `failed` admit no further writes.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the state machine allows `self -> next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed | Self::Failed)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to extract and structure one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJob {
    pub id: JobId,
    pub url: String,
    pub status: JobStatus,
    pub processing_options: ProcessingOptions,
    pub output_format: OutputFormat,
    pub original_content: Option<String>,
    pub structured_content: Option<StructuredContent>,

    /// Holds `rawFormatted`, `page`, `organizationWarning`, or `error`.
    pub metadata: Option<JobMetadata>,

    pub word_count: Option<usize>,

    /// Wall time from entering `processing` to the terminal write.
    #[serde(rename = "processingTime")]
    pub processing_time_ms: Option<u64>,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    /// A new job in `pending`.
    #[must_use]
    pub fn new(request: SubmitRequest) -> Self {
        Self {
            id: JobId::new(),
            url: request.url,
            status: JobStatus::Pending,
            processing_options: request.processing_options,
            output_format: request.output_format,
            original_content: None,
            structured_content: None,
            metadata: None,
            word_count: None,
            processing_time_ms: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Processing time as a `Duration`.
    #[must_use]
    pub fn processing_time(&self) -> Option<Duration> {
        self.processing_time_ms.map(Duration::from_millis)
    }

    /// The stored raw-formatted text, if any.
    #[must_use]
    pub fn raw_formatted(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("rawFormatted"))
            .and_then(serde_json::Value::as_str)
    }

    /// Apply a partial update.
    ///
    /// Rejects any write to a terminal job and any status change the state
    /// machine does not allow. A rejected update leaves the job untouched.
    pub fn apply(&mut self, update: JobUpdate) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: update.status.unwrap_or(self.status),
            });
        }
        if let Some(next) = update.status {
            if next != self.status && !self.status.can_transition_to(next) {
                return Err(Error::InvalidTransition { from: self.status, to: next });
            }
            if next.is_terminal() && update.completed_at.is_none() && self.completed_at.is_none() {
                return Err(Error::Store(format!(
                    "job {} moved to {next} without a completion time",
                    self.id
                )));
            }
        }

        let JobUpdate {
            status,
            original_content,
            structured_content,
            metadata,
            word_count,
            processing_time_ms,
            completed_at,
        } = update;

        if let Some(status) = status {
            self.status = status;
        }
        if original_content.is_some() {
            self.original_content = original_content;
        }
        if structured_content.is_some() {
            self.structured_content = structured_content;
        }
        if metadata.is_some() {
            self.metadata = metadata;
        }
        if word_count.is_some() {
            self.word_count = word_count;
        }
        if processing_time_ms.is_some() {
            self.processing_time_ms = processing_time_ms;
        }
        if completed_at.is_some() {
            self.completed_at = completed_at;
        }
        Ok(())
    }
}

/// Partial job fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub original_content: Option<String>,
    pub structured_content: Option<StructuredContent>,
    pub metadata: Option<JobMetadata>,
    pub word_count: Option<usize>,
    pub processing_time_ms: Option<u64>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    /// Only a status change.
    #[must_use]
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub url: String,

    #[serde(default)]
    pub processing_options: ProcessingOptions,

    #[serde(default)]
    pub output_format: OutputFormat,
}

impl SubmitRequest {
    /// Submission with default options and markdown output.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            processing_options: ProcessingOptions::default(),
            output_format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.processing_options = options;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Check the URL scheme and option bounds.
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(self.url.trim())
            .map_err(|e| Error::InvalidInput(format!("malformed url {:?}: {e}", self.url)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!(
                "url scheme must be http or https, got {:?}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidInput(format!("url {:?} has no host", self.url)));
        }

        self.processing_options.validate()
    }
}
