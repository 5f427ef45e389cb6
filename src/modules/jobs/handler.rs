use super::dto::{DownloadJobRequest, JobCreatedResponse, JobStatusResponse};
use super::service::JobService;
use crate::common::response::ApiError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use crate::state::AppState;
use uuid::Uuid;
use validator::Validate;

/// Start a download job
#[utoipa::path(
    post,
    path = "/api/download_job",
    request_body = DownloadJobRequest,
    responses(
        (status = 202, description = "Job accepted", body = JobCreatedResponse),
        (status = 400, description = "Missing or empty URL")
    ),
    tag = "Jobs"
)]
pub async fn start_download_job(
    State(state): State<AppState>,
    Json(payload): Json<DownloadJobRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::bad_request(&e.to_string()).into_response();
    }

    let created = JobService::submit(state, payload).await;
    (StatusCode::ACCEPTED, Json(created)).into_response()
}

/// Poll job status
#[utoipa::path(
    get,
    path = "/api/status/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Current job snapshot", body = JobStatusResponse),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs"
)]
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    match JobService::status(state, job_id).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => ApiError::not_found("Job not found").into_response(),
    }
}
