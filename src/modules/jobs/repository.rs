use super::model::Job;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// In-memory job table shared between the HTTP layer and the worker pool.
///
/// Readers always get a cloned snapshot, never a reference into the map, so
/// a poll can never observe a half-applied mutation. All writes for a given
/// job go through the single worker that owns it; `update` applies the
/// closure under the write lock so status and its dependent fields change
/// atomically with respect to readers.
#[derive(Clone, Default)]
pub struct JobRepository {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, job: Job) -> Uuid {
        let id = job.id;
        self.jobs.write().await.insert(id, job);
        id
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Apply a mutation to a job record. Terminal jobs are frozen: a late
    /// write against a completed or errored job is dropped with a warning
    /// so repeated status polls of a terminal job stay identical.
    pub async fn update<F>(&self, id: Uuid, mutate: F)
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&id) {
            Some(job) if job.status.is_terminal() => {
                warn!(job_id = %id, status = ?job.status, "ignoring update to terminal job");
            }
            Some(job) => mutate(job),
            None => warn!(job_id = %id, "update for unknown job"),
        }
    }
}
