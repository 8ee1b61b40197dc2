use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use raster_strokes::PixelBufferError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Image error: {0}")]
    Image(#[from] LoadError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures while turning input bytes into a pixel buffer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Empty image data")]
    Empty,

    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Image too large: {width}x{height} (max {max} pixels)")]
    TooLarge { width: u32, height: u32, max: u64 },

    #[error("Invalid pixel data: {0}")]
    Pixels(#[from] PixelBufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::DecodingError> for LoadError {
    fn from(e: png::DecodingError) -> Self {
        LoadError::Decode(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Image(LoadError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::Image(LoadError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            ApiError::Image(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
