use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::jobs::handler::start_download_job,
        crate::modules::jobs::handler::get_job_status,
        crate::modules::jobs::stream_handler::get_file,
        crate::modules::info::handler::get_video_info,
    ),
    components(
        schemas(
            crate::modules::jobs::dto::DownloadJobRequest,
            crate::modules::jobs::dto::JobCreatedResponse,
            crate::modules::jobs::dto::JobStatusResponse,
            crate::modules::jobs::model::JobStatus,
            crate::modules::jobs::model::Quality,
            crate::modules::jobs::model::Mode,
            crate::modules::jobs::model::HealthReport,
            crate::modules::info::dto::InfoRequest,
            crate::modules::info::dto::InfoResponse,
        )
    ),
    tags(
        (name = "Jobs", description = "Download job submission, polling and retrieval"),
        (name = "Info", description = "Source metadata lookup")
    )
)]
pub struct ApiDoc;
