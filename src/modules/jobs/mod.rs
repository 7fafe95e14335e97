use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod events;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

// Upload bodies are capped well above any realistic media+audio pair.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handler::upload))
        .route("/status/{uuid}", get(handler::status))
        .route("/download/{uuid}/output.mp4", get(handler::download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
