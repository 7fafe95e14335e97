use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::jobs::handler::upload,
        crate::modules::jobs::handler::status,
        crate::modules::jobs::handler::download,
    ),
    components(
        schemas(
            crate::modules::jobs::dto::UploadResponse,
            crate::modules::jobs::dto::StatusResponse,
            crate::modules::jobs::model::JobStatus,
        )
    ),
    tags(
        (name = "Jobs", description = "Job submission, status polling and artifact retrieval")
    )
)]
pub struct ApiDoc;
