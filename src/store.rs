//! In-memory job store for tests, the CLI, and development.
//!
//! Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::job::{JobId, JobUpdate, ScrapeJob};
use crate::traits::JobStore;

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, ScrapeJob>,
    /// Insertion order, oldest first.
    order: Vec<JobId>,
}

/// `JobStore` backed by a map behind an async lock.
///
/// Every update goes through [`ScrapeJob::apply`], so the state machine is
/// enforced here as well as in the manager.
#[derive(Default)]
pub struct MemoryJobStore {
    inner: RwLock<Inner>,
}

impl MemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: ScrapeJob) -> Result<JobId> {
        let mut inner = self.inner.write().await;
        let id = job.id;
        if inner.jobs.contains_key(&id) {
            return Err(Error::Store(format!("job {id} already exists")));
        }
        inner.jobs.insert(id, job);
        inner.order.push(id);
        Ok(id)
    }

    async fn get(&self, id: JobId) -> Result<Option<ScrapeJob>> {
        Ok(self.inner.read().await.jobs.get(&id).cloned())
    }

    async fn update(&self, id: JobId, update: JobUpdate) -> Result<Option<ScrapeJob>> {
        let mut inner = self.inner.write().await;
        let Some(job) = inner.jobs.get_mut(&id) else {
            return Ok(None);
        };

        // Apply to a copy so a rejected update leaves the record as it was
        let mut next = job.clone();
        next.apply(update)?;
        *job = next.clone();
        Ok(Some(next))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<ScrapeJob>> {
        let inner = self.inner.read().await;
        let mut jobs: Vec<(usize, &ScrapeJob)> = inner
            .order
            .iter()
            .enumerate()
            .filter_map(|(pos, id)| inner.jobs.get(id).map(|job| (pos, job)))
            .collect();

        // Newest first; insertion order breaks timestamp ties
        jobs.sort_by(|(pa, a), (pb, b)| b.created_at.cmp(&a.created_at).then(pb.cmp(pa)));

        Ok(jobs.into_iter().take(limit).map(|(_, job)| job.clone()).collect())
    }
}
