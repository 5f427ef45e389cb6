use super::dto::{DownloadJobRequest, JobCreatedResponse, JobStatusResponse};
use super::model::Job;
use crate::state::AppState;
use uuid::Uuid;

pub struct JobService;

impl JobService {
    /// Register a job and hand it to the worker pool. Never blocks on the
    /// pool being busy; the job simply stays `pending` until a worker
    /// picks it up.
    pub async fn submit(state: AppState, req: DownloadJobRequest) -> JobCreatedResponse {
        let job = Job::new(req.url, req.quality, req.mode);
        let status = job.status;
        let job_id = state.jobs.insert(job).await;
        state.queue.submit(job_id);

        JobCreatedResponse { job_id, status }
    }

    pub async fn status(state: AppState, job_id: Uuid) -> Option<JobStatusResponse> {
        state
            .jobs
            .snapshot(job_id)
            .await
            .map(JobStatusResponse::from)
    }
}
