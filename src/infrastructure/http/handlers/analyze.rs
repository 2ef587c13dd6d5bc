//! Analyze / Resample HTTP Handlers

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::path::Path;
use std::sync::Arc;

use crate::application::{AnalyzeAudio, ResampleAudio};
use crate::domain::audio::EncodedAudioBlob;
use crate::infrastructure::http::dto::{AnalysisResponse, ApiResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

use super::audio::attachment_disposition;

/// 多文件上传字段名（与分类服务一致）
const FILES_FIELD: &str = "files";
const FILE_FIELD: &str = "file";
const TARGET_RATE_FIELD: &str = "target_rate";

/// 根据扩展名推断 MIME 类型
fn audio_mime(file_name: Option<&str>) -> &'static str {
    let ext = file_name
        .and_then(|f| Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

async fn read_clip(field: axum::extract::multipart::Field<'_>) -> Result<EncodedAudioBlob, ApiError> {
    let file_name = field.file_name().map(|s| s.to_string());
    let mime_type = field
        .content_type()
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| audio_mime(file_name.as_deref()).to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

    let clip = EncodedAudioBlob::new(data.to_vec(), mime_type);
    Ok(match file_name {
        Some(name) => clip.with_file_name(name),
        None => clip,
    })
}

/// 上传并分析一批音频
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<AnalysisResponse>>, ApiError> {
    let mut clips = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == FILES_FIELD || field_name == FILE_FIELD {
            clips.push(read_clip(field).await?);
        }
    }

    tracing::info!(clips = clips.len(), "Analyze request received");

    let report = state.analyze_handler.handle(AnalyzeAudio { clips }).await?;

    Ok(Json(ApiResponse::success(report.into())))
}

/// 重采样单个音频，直接返回 WAV
pub async fn resample(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut clip: Option<EncodedAudioBlob> = None;
    let mut target_rate: Option<u32> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            FILE_FIELD => clip = Some(read_clip(field).await?),
            TARGET_RATE_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read target_rate: {}", e)))?;
                let rate = text
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid target_rate: {}", text)))?;
                target_rate = Some(rate);
            }
            _ => {}
        }
    }

    let clip = clip.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let output = state
        .resample_handler
        .handle(ResampleAudio { clip, target_rate })
        .await?;

    let disposition = attachment_disposition(output.file_name(), "resampled.wav");

    Ok((
        [
            (header::CONTENT_TYPE, output.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.bytes().to_vec(),
    )
        .into_response())
}
