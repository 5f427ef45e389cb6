use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod stream_handler;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/download_job", post(handler::start_download_job))
        .route("/status/{job_id}", get(handler::get_job_status))
        .route("/file/{job_id}", get(stream_handler::get_file))
}
