use super::model::{HealthReport, Job, JobStatus, Mode, Quality};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DownloadJobRequest {
    #[validate(length(min = 1, message = "No URL provided"))]
    pub url: String,
    #[serde(default = "default_quality")]
    pub quality: Quality,
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

fn default_quality() -> Quality {
    Quality::High
}

fn default_mode() -> Mode {
    Mode::Video
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobCreatedResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// Point-in-time view of a job, safe to hand to polling clients. The
/// server-side file path stays internal.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub url: String,
    pub quality: Quality,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            url: job.source_url,
            quality: job.quality,
            mode: job.mode,
            title: job.title,
            health: job.health,
            error: job.error,
            created_at: job.created_at,
        }
    }
}
