//! Render-job state store.
//!
//! Job state is ephemeral and process-local by design; the store is an
//! injected collaborator rather than a process-wide mutable map, so the
//! status-read path and the completion-write path go through one lock and a
//! different backing store can be swapped in without touching callers.

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// One render job, mutated in place as the async render task progresses.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub id: String,
    pub video_id: String,
    pub status: JobStatus,
    /// 0..=100
    pub progress: u8,
    pub output_url: Option<String>,
    pub error: Option<String>,
    pub created_at: SystemTime,
    pub completed_at: Option<SystemTime>,
}

impl RenderJob {
    /// A freshly queued job with a generated id.
    pub fn queued(video_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            video_id: video_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            output_url: None,
            error: None,
            created_at: SystemTime::now(),
            completed_at: None,
        }
    }
}

/// Backing store interface for render jobs.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, job_id: &str) -> Result<Option<RenderJob>>;
    async fn set(&self, job: RenderJob) -> Result<()>;
    async fn delete(&self, job_id: &str) -> Result<bool>;
}

/// In-memory store. Entries are never collected automatically; callers that
/// care can `delete` finished jobs.
pub struct MemoryJobStore {
    jobs: Arc<RwLock<HashMap<String, RenderJob>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: &str) -> Result<Option<RenderJob>> {
        Ok(self.jobs.read().unwrap().get(job_id).cloned())
    }

    async fn set(&self, job: RenderJob) -> Result<()> {
        self.jobs.write().unwrap().insert(job.id.clone(), job);
        Ok(())
    }

    async fn delete(&self, job_id: &str) -> Result<bool> {
        Ok(self.jobs.write().unwrap().remove(job_id).is_some())
    }
}
