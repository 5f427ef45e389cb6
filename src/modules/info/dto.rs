use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InfoRequest {
    #[validate(length(min = 1, message = "No URL provided"))]
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub duration: Option<String>,
}
