use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;

use crate::{
    render::orchestrator::RenderRequest,
    server::{AppState, error::ApiError},
};

pub const RENDER_DONE: &str = "Render done!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionVideoResponse {
    pub message: &'static str,
    pub output_location: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn caption_video(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<CaptionVideoResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let props = request.validate()?;

    tracing::info!(
        video_file = %props.video_file,
        groups = props.groups.len(),
        frames = props.duration_in_frames,
        "caption_video_requested"
    );

    let orchestrator = state.orchestrator.clone();
    let output = tokio::task::spawn_blocking(move || orchestrator.render_props(&props))
        .await
        .map_err(|e| ApiError::Render(format!("render task aborted: {e}")))??;

    Ok(Json(CaptionVideoResponse {
        message: RENDER_DONE,
        output_location: output.output_location,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
