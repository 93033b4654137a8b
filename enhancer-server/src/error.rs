use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use enhancer::EnhanceError;

/// Per-request failures with their HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No `file` field in upload")]
    MissingFile,
    #[error("Failed to read multipart upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Enhance(#[from] EnhanceError),
    #[error("Image worker did not finish: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "No file provided!"),
            ApiError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Uploaded file is too large!")
            }
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "Invalid multipart request!"),
            ApiError::Enhance(e) if e.is_invalid_input() => {
                (StatusCode::BAD_REQUEST, "Invalid image file!")
            }
            ApiError::Enhance(_) | ApiError::Worker(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error processing image!")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            log::error!("Error processing image: {self}");
        } else {
            log::warn!("Rejected upload: {self}");
        }

        (status, message).into_response()
    }
}
