//! Recording HTTP Handlers
//!
//! 浏览器按块上传麦克风采样（little-endian f32，interleaved）

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AppendFrames, GetRecording, PauseRecording, ResumeRecording, StartRecording, StopRecording,
};
use crate::domain::recording::RecordingId;
use crate::infrastructure::http::dto::{
    ApiResponse, AppendFramesResult, RecordingResponse, StartRecordingRequest, StopRecordingResult,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 解析 little-endian f32 序列
fn decode_f32_le(body: &[u8]) -> Result<Vec<f32>, ApiError> {
    if body.len() % 4 != 0 {
        return Err(ApiError::BadRequest(format!(
            "Frame payload length {} is not a multiple of 4",
            body.len()
        )));
    }
    Ok(body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub async fn start_recording(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRecordingRequest>,
) -> Result<Json<ApiResponse<RecordingResponse>>, ApiError> {
    let status = state
        .start_recording_handler
        .handle(StartRecording {
            sample_rate: req.sample_rate,
            channels: req.channels,
        })
        .await?;

    Ok(Json(ApiResponse::success(status.into())))
}

pub async fn get_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordingResponse>>, ApiError> {
    let status = state
        .get_recording_handler
        .handle(GetRecording {
            recording_id: RecordingId::from_uuid(id),
        })
        .await?;

    Ok(Json(ApiResponse::success(status.into())))
}

pub async fn append_frames(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<AppendFramesResult>>, ApiError> {
    let samples = decode_f32_le(&body)?;

    let result = state
        .append_frames_handler
        .handle(AppendFrames {
            recording_id: RecordingId::from_uuid(id),
            samples,
        })
        .await?;

    Ok(Json(ApiResponse::success(result.into())))
}

pub async fn pause_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordingResponse>>, ApiError> {
    let status = state
        .pause_recording_handler
        .handle(PauseRecording {
            recording_id: RecordingId::from_uuid(id),
        })
        .await?;

    Ok(Json(ApiResponse::success(status.into())))
}

pub async fn resume_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordingResponse>>, ApiError> {
    let status = state
        .resume_recording_handler
        .handle(ResumeRecording {
            recording_id: RecordingId::from_uuid(id),
        })
        .await?;

    Ok(Json(ApiResponse::success(status.into())))
}

/// 停止录音并分析
pub async fn stop_recording(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StopRecordingResult>>, ApiError> {
    let result = state
        .stop_recording_handler
        .handle(StopRecording {
            recording_id: RecordingId::from_uuid(id),
        })
        .await?;

    tracing::info!(
        recording_id = %id,
        duration_ms = result.duration_ms,
        "Recording analyzed"
    );

    Ok(Json(ApiResponse::success(result.into())))
}
