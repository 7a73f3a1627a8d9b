//! Gateway handlers: URL-mode analysis and Word export.
//!
//! The analysis result is an explicit value threaded from the invocation step to
//! the response (and, for export, supplied by the caller in the request body) —
//! never ambient session state, so concurrent requests stay independent.

use crate::AppState;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use callsight_core::{analyze_call, AnalysisError};
use serde::Deserialize;

/// Fallback when the audio host sends no usable Content-Type.
const DEFAULT_AUDIO_MIME: &str = "audio/mp3";

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Public URL of the recorded call (mp3 or equivalent).
    pub file_url: String,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    /// Raw analysis markdown, as returned by the analyze endpoint.
    pub markdown: String,
    /// Document title; defaults to the standard report heading.
    #[serde(default)]
    pub title: Option<String>,
}

/// GET / — liveness message.
pub async fn root_get() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Sales Call Audio Analysis API is running",
    }))
}

/// POST /api/v1/analyze — download the audio, invoke the model, parse the
/// response. Transport failures return an error status with no partial report.
pub async fn analyze_post(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Response {
    let file_url = body.file_url.trim().to_string();
    if file_url.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "missing 'file_url' in request body");
    }
    let Some(bridge) = state.bridge.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "no Gemini API key configured",
        );
    };

    let (audio, mime_type) = match fetch_audio(&state, &file_url).await {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(%file_url, error = %e, "audio fetch failed");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    tracing::info!(%file_url, bytes = audio.len(), %mime_type, "starting analysis");
    match analyze_call(bridge.as_ref(), state.config.as_ref(), &audio, &mime_type).await {
        Ok((report, raw_markdown)) => {
            let flat = report.flat_sections();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "success",
                    "source_url": file_url,
                    "analyzed_at": chrono::Utc::now().to_rfc3339(),
                    "report": flat,
                    "analysis": report,
                    "raw_markdown": raw_markdown,
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(%file_url, error = %e, "analysis failed");
            let status = match &e {
                AnalysisError::AudioFetch(_) => StatusCode::BAD_REQUEST,
                AnalysisError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
                AnalysisError::Transport(_)
                | AnalysisError::ModelStatus { .. }
                | AnalysisError::EmptyResponse => StatusCode::BAD_GATEWAY,
            };
            error_response(status, &e.to_string())
        }
    }
}

/// POST /api/v1/export — render analysis markdown as a .docx download.
pub async fn export_post(Json(body): Json<ExportRequest>) -> Response {
    let title = body
        .title
        .unwrap_or_else(|| "Sales Performance Analysis Report".to_string());
    match callsight_export::render_markdown_docx(&title, &body.markdown) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"analysis_report.docx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "docx export failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Download the source audio, returning (bytes, MIME type from Content-Type).
async fn fetch_audio(state: &AppState, url: &str) -> Result<(Vec<u8>, String), AnalysisError> {
    let res = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| AnalysisError::AudioFetch(e.to_string()))?;
    if !res.status().is_success() {
        return Err(AnalysisError::AudioFetch(format!(
            "failed to download file (HTTP {})",
            res.status().as_u16()
        )));
    }
    let mime_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());
    let bytes = res
        .bytes()
        .await
        .map_err(|e| AnalysisError::AudioFetch(e.to_string()))?;
    Ok((bytes.to_vec(), mime_type))
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
}
