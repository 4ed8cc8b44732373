//! The job lifecycle manager.
//!
//! Owns every write to a job after it is created. A submission records the
//! job as `pending` and returns at once; a spawned task then moves it to
//! `processing`, runs the pipeline once, and writes exactly one terminal
//! state. There are no retries and no cancellation.
//!
//! Pipeline: render -> extract (blocking pool) -> organize -> assemble.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, RenderError, Result};
use crate::export::{render_export, Export, ExportRequest};
use crate::extract::scrape_html;
use crate::job::{JobId, JobMetadata, JobStatus, JobUpdate, ScrapeJob, SubmitRequest};
use crate::result::{ScrapedContent, StructuredContent};
use crate::structured::{assemble_structured, OrganizerReply};
use crate::traits::{JobStore, Organizer, PageRenderer};

/// Handle to a submitted job.
#[derive(Debug)]
pub struct SubmittedJob {
    pub id: JobId,

    /// The pipeline task. Dropping it does not stop the job.
    pub task: JoinHandle<()>,
}

/// Everything a successful pipeline run writes.
struct PipelineOutput {
    scraped: ScrapedContent,
    structured: StructuredContent,
    metadata: JobMetadata,
}

/// Runs scrape jobs against injected collaborators.
#[derive(Clone)]
pub struct JobManager {
    store: Arc<dyn JobStore>,
    renderer: Arc<dyn PageRenderer>,
    organizer: Option<Arc<dyn Organizer>>,
}

impl JobManager {
    /// A manager without an organizer. Jobs asking for AI organization
    /// complete with the fallback structure and a warning.
    pub fn new(store: Arc<dyn JobStore>, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            store,
            renderer,
            organizer: None,
        }
    }

    #[must_use]
    pub fn with_organizer(mut self, organizer: Arc<dyn Organizer>) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// Validate and record a job, then start its pipeline in the background.
    ///
    /// Invalid submissions are rejected here and never reach the store.
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmittedJob> {
        request.validate()?;

        let job = ScrapeJob::new(request);
        let url = job.url.clone();
        let id = self.store.create(job).await?;
        info!(job_id = %id, url = %url, "job submitted");

        let manager = self.clone();
        let task = tokio::spawn(async move { manager.run(id).await });

        Ok(SubmittedJob { id, task })
    }

    /// Current state of a job.
    pub async fn status(&self, id: JobId) -> Result<ScrapeJob> {
        self.store.get(id).await?.ok_or(Error::NotFound(id))
    }

    /// Most recently created jobs first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<ScrapeJob>> {
        self.store.list_recent(limit).await
    }

    /// Render a completed job for download. The job is not modified.
    pub async fn export(&self, id: JobId, request: ExportRequest) -> Result<Export> {
        let job = self.status(id).await?;
        render_export(&job, request)
    }

    async fn run(&self, id: JobId) {
        let job = match self.store.update(id, JobUpdate::status(JobStatus::Processing)).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                warn!(job_id = %id, "job vanished before processing");
                return;
            }
            Err(err) => {
                warn!(job_id = %id, error = %err, "could not start job");
                return;
            }
        };
        let started = Instant::now();
        info!(job_id = %id, url = %job.url, "job processing");

        let outcome = self.pipeline(&job).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let update = match outcome {
            Ok(output) => {
                info!(
                    job_id = %id,
                    elapsed_ms,
                    words = output.scraped.metadata.word_count,
                    sections = output.structured.sections.len(),
                    "job completed"
                );
                completed_update(output, elapsed_ms)
            }
            Err(err) => {
                warn!(job_id = %id, stage = %err.stage(), error = %err, elapsed_ms, "job failed");
                failed_update(&err, elapsed_ms)
            }
        };

        if let Err(err) = self.store.update(id, update).await {
            warn!(job_id = %id, error = %err, "could not record job result");
            // Leave the job terminal even when the result write failed
            let fallback = failed_update(&err, elapsed_ms);
            if let Err(err) = self.store.update(id, fallback).await {
                warn!(job_id = %id, error = %err, "could not record job failure");
            }
        }
    }

    async fn pipeline(&self, job: &ScrapeJob) -> Result<PipelineOutput> {
        let options = job.processing_options.clone();
        let timeout = options.timeout;

        let html = match tokio::time::timeout(timeout, self.renderer.render(&job.url, timeout)).await
        {
            Ok(rendered) => rendered?,
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: job.url.clone(),
                    after: timeout,
                }
                .into())
            }
        };
        debug!(job_id = %job.id, bytes = html.len(), "page rendered");

        let url = job.url.clone();
        let extract_options = options.clone();
        let scraped = tokio::task::spawn_blocking(move || scrape_html(&html, &url, &extract_options))
            .await
            .map_err(|e| Error::Extraction(e.to_string()))?;

        let reply_text = match (&self.organizer, options.ai_organization) {
            (Some(organizer), true) => {
                Some(organize(organizer.as_ref(), &scraped, timeout).await?)
            }
            _ => None,
        };
        let reply = match (&reply_text, options.ai_organization) {
            (Some(text), _) => OrganizerReply::Text(text),
            (None, true) => OrganizerReply::Unavailable,
            (None, false) => OrganizerReply::NotRequested,
        };
        let assembly = assemble_structured(&scraped, reply);

        let mut metadata = JobMetadata::new();
        if let Some(raw) = &scraped.raw_formatted {
            metadata.insert("rawFormatted".to_string(), Value::String(raw.clone()));
        }
        if options.include_metadata {
            metadata.insert("page".to_string(), page_metadata(&scraped));
        }
        if let Some(warning) = assembly.warning {
            warn!(job_id = %job.id, %warning, "organization fell back to defaults");
            metadata.insert("organizationWarning".to_string(), Value::String(warning));
        }

        Ok(PipelineOutput {
            scraped,
            structured: assembly.structured,
            metadata,
        })
    }
}

/// Call the organizer under the job timeout. Every failure is attributed
/// to the organization stage.
async fn organize(
    organizer: &dyn Organizer,
    scraped: &ScrapedContent,
    timeout: std::time::Duration,
) -> Result<String> {
    let reply = tokio::time::timeout(timeout, organizer.organize(&scraped.content, &scraped.url))
        .await
        .map_err(|_| Error::Organization(format!("organizer timed out after {}s", timeout.as_secs())))?;

    reply.map_err(|err| match err {
        Error::Organization(message) => Error::Organization(message),
        other => Error::Organization(other.to_string()),
    })
}

fn page_metadata(scraped: &ScrapedContent) -> Value {
    let mut page = json!({
        "title": scraped.title,
        "description": scraped.description,
        "scrapedAt": scraped.metadata.scraped_at,
        "hasImages": scraped.metadata.has_images,
        "linkCount": scraped.metadata.link_count,
        "source": scraped.source,
    });
    if !scraped.images.is_empty() {
        page["images"] = json!(scraped.images);
    }
    page
}

fn completed_update(output: PipelineOutput, elapsed_ms: u64) -> JobUpdate {
    let PipelineOutput {
        scraped,
        structured,
        metadata,
    } = output;

    JobUpdate {
        status: Some(JobStatus::Completed),
        word_count: Some(scraped.metadata.word_count),
        original_content: Some(scraped.content),
        structured_content: Some(structured),
        metadata: (!metadata.is_empty()).then_some(metadata),
        processing_time_ms: Some(elapsed_ms),
        completed_at: Some(Utc::now()),
    }
}

fn failed_update(err: &Error, elapsed_ms: u64) -> JobUpdate {
    let now = Utc::now();
    let mut metadata = JobMetadata::new();
    metadata.insert(
        "error".to_string(),
        json!({
            "stage": err.stage(),
            "message": err.to_string(),
            "timestamp": now,
        }),
    );

    JobUpdate {
        status: Some(JobStatus::Failed),
        metadata: Some(metadata),
        processing_time_ms: Some(elapsed_ms),
        completed_at: Some(now),
        ..JobUpdate::default()
    }
}
