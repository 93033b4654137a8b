use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

pub fn router(max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/enhance", post(enhance_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
}

async fn enhance_image(mut multipart: Multipart) -> Result<Response, ApiError> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    log::info!("Received file: {filename} ({} bytes)", data.len());

    // decode/sharpen/encode is CPU bound, keep it off the async workers
    let enhanced =
        tokio::task::spawn_blocking(move || enhancer::enhance(&data, &filename)).await??;

    log::debug!(
        "Enhanced {}x{} image, {} bytes",
        enhanced.dimensions.0,
        enhanced.dimensions.1,
        enhanced.data.len()
    );

    Ok(([(header::CONTENT_TYPE, enhanced.media_type())], enhanced.data).into_response())
}

/// Buffer the first `file` field, skipping any others
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            log::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok((filename, data));
    }

    Err(ApiError::MissingFile)
}
