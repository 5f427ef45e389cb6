use super::dto::{InfoRequest, InfoResponse};
use super::service::InfoService;
use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

/// Probe source metadata without downloading
#[utoipa::path(
    post,
    path = "/api/info",
    request_body = InfoRequest,
    responses(
        (status = 200, description = "Source metadata", body = InfoResponse),
        (status = 400, description = "Missing or empty URL"),
        (status = 502, description = "Source could not be queried")
    ),
    tag = "Info"
)]
pub async fn get_video_info(
    State(state): State<AppState>,
    Json(payload): Json<InfoRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::bad_request(&e.to_string()).into_response();
    }

    match InfoService::lookup(state, &payload.url).await {
        Ok(info) => Json(info).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::BAD_GATEWAY).into_response(),
    }
}
