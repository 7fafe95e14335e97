use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::dto::{StatusResponse, UploadResponse, UploadedFile};
use super::service::JobService;
use crate::state::AppState;

/// Submit a media+audio pair for processing
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Job accepted", body = UploadResponse),
        (status = 400, description = "Missing file field or invalid format"),
        (status = 500, description = "Pipeline failure")
    ),
    tag = "Jobs"
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut media: Option<UploadedFile> = None;
    let mut audio: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let name = field.name().unwrap_or("").to_string();
        if name != "media" && name != "audio" {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("failed to read {name} upload: {e}"),
                )
                    .into_response();
            }
        };

        let file = UploadedFile {
            filename,
            content_type,
            data,
        };
        match name.as_str() {
            "media" => media = Some(file),
            _ => audio = Some(file),
        }
    }

    let Some(media) = media else {
        return (
            StatusCode::BAD_REQUEST,
            "media file required (image or video)",
        )
            .into_response();
    };
    let Some(audio) = audio else {
        return (StatusCode::BAD_REQUEST, "audio file required").into_response();
    };

    match JobService::submit(state, media, audio).await {
        Ok(uuid) => Json(UploadResponse { uuid }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Poll the status of a submitted job
#[utoipa::path(
    get,
    path = "/status/{uuid}",
    params(
        ("uuid" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Current job status", body = StatusResponse),
        (status = 404, description = "Unknown job")
    ),
    tag = "Jobs"
)]
pub async fn status(State(state): State<AppState>, Path(uuid): Path<Uuid>) -> Response {
    match JobService::status(state, uuid).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Download the finished artifact
#[utoipa::path(
    get,
    path = "/download/{uuid}/output.mp4",
    params(
        ("uuid" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Artifact stream", body = Vec<u8>),
        (status = 404, description = "Artifact not present")
    ),
    tag = "Jobs"
)]
pub async fn download(State(state): State<AppState>, Path(uuid): Path<Uuid>) -> Response {
    let file = match JobService::download(state, uuid).await {
        Ok(file) => file,
        Err(e) => return e.into_response(),
    };

    let body = Body::from_stream(file.stream);

    Response::builder()
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", file.filename),
        )
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
