use crate::common::response::ApiError;
use crate::infrastructure::storage::downloads::sanitize_download_name;
use crate::modules::jobs::model::JobStatus;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tokio_util::io::ReaderStream;
use tracing::error;
use uuid::Uuid;

/// Serve a completed job's file as an attachment, then reclaim it.
///
/// The three failure shapes are deliberately distinct: unknown id (404),
/// job not finished (409), and a completed job whose file has already left
/// the disk (500).
#[utoipa::path(
    get,
    path = "/api/file/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "File download"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job not completed yet"),
        (status = 500, description = "File missing from server")
    ),
    tag = "Jobs"
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    let Some(job) = state.jobs.snapshot(job_id).await else {
        return ApiError::not_found("Job not found").into_response();
    };

    if job.status != JobStatus::Completed {
        return ApiError::not_ready("File not ready").into_response();
    }

    // Completed implies a result path; a snapshot violating that would be
    // a writer bug, not a client error.
    let Some(path) = job.result_path else {
        error!(job_id = %job_id, "completed job without result path");
        return ApiError::internal("File missing from server").into_response();
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            error!(job_id = %job_id, path = %path.display(), error = %e, "result file unreadable");
            return ApiError::internal("File missing from server").into_response();
        }
    };

    let title = job.title.as_deref().unwrap_or("media");
    let download_name = format!(
        "{}.{}",
        sanitize_download_name(title),
        job.mode.extension()
    );
    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or(job.mode.mime_fallback());

    // The open handle above keeps the stream valid while the delayed
    // removal task reclaims the directory entry.
    state.storage.schedule_removal(path);

    let body = Body::from_stream(ReaderStream::new(file));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}
