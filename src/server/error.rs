use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::foundation::error::CaptionError;

pub const RENDER_FAILED: &str = "Failed to render video";

#[derive(Debug, Serialize)]
pub struct BadRequestBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RenderFailedBody {
    pub error: &'static str,
    pub details: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Render failed: {0}")]
    Render(String),
}

impl From<CaptionError> for ApiError {
    fn from(err: CaptionError) -> Self {
        match err {
            CaptionError::Validation(message) => Self::BadRequest(message),
            other => Self::Render(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(error) => {
                tracing::warn!(error = %error, "bad_request");
                (StatusCode::BAD_REQUEST, Json(BadRequestBody { error })).into_response()
            }
            Self::Render(details) => {
                tracing::error!(error = %details, "render_failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(RenderFailedBody {
                        error: RENDER_FAILED,
                        details,
                    }),
                )
                    .into_response()
            }
        }
    }
}
