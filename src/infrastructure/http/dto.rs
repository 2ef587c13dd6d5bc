//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    AnalysisReport, AppendFramesResponse, ClipInfo, RecordingStatus, StopRecordingResponse,
};
use crate::domain::metadata::MetadataRow;
use crate::domain::prediction::PredictionOutcome;
use crate::domain::recording::RecordingState;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 已存储音频的下载地址
pub fn clip_download_url(clip_id: Uuid) -> String {
    format!("/api/audio/{}", clip_id)
}

// ============================================================================
// Analysis DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ClipResponse {
    pub clip_id: Uuid,
    pub file_name: String,
    pub download_name: String,
    pub download_url: String,
    pub mime_type: String,
    pub size: usize,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub duration_ms: Option<u64>,
}

impl From<ClipInfo> for ClipResponse {
    fn from(info: ClipInfo) -> Self {
        Self {
            download_url: clip_download_url(info.clip_id),
            clip_id: info.clip_id,
            file_name: info.file_name,
            download_name: info.download_name,
            mime_type: info.mime_type,
            size: info.size,
            sample_rate: info.sample_rate,
            channels: info.channels,
            duration_ms: info.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    #[serde(flatten)]
    pub outcome: PredictionOutcome,
    pub download_url: Option<String>,
}

/// 分析报告（表格 + 结果 + 下载链接）
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub metadata: Vec<MetadataRow>,
    pub results: Vec<ResultResponse>,
    pub eer: Option<String>,
    pub clips: Vec<ClipResponse>,
}

impl From<AnalysisReport> for AnalysisResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            metadata: report.metadata,
            results: report
                .results
                .into_iter()
                .map(|r| ResultResponse {
                    download_url: r.clip_id.map(clip_download_url),
                    outcome: r.outcome,
                })
                .collect(),
            eer: report.eer,
            clips: report.clips.into_iter().map(ClipResponse::from).collect(),
        }
    }
}

// ============================================================================
// Recording DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartRecordingRequest {
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_channels() -> u16 {
    1
}

#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub id: Uuid,
    pub state: RecordingState,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub duration_ms: u64,
}

impl From<RecordingStatus> for RecordingResponse {
    fn from(status: RecordingStatus) -> Self {
        Self {
            id: *status.id.as_uuid(),
            state: status.state,
            sample_rate: status.sample_rate,
            channels: status.channels,
            frames: status.frames,
            duration_ms: status.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppendFramesResult {
    pub accepted_frames: usize,
    pub recording: RecordingResponse,
}

impl From<AppendFramesResponse> for AppendFramesResult {
    fn from(resp: AppendFramesResponse) -> Self {
        Self {
            accepted_frames: resp.accepted_frames,
            recording: resp.status.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResult {
    pub id: Uuid,
    pub duration_ms: u64,
    /// 采集采样率的原始录音
    pub recording_url: String,
    pub analysis: AnalysisResponse,
}

impl From<StopRecordingResponse> for StopRecordingResult {
    fn from(resp: StopRecordingResponse) -> Self {
        Self {
            id: *resp.recording_id.as_uuid(),
            duration_ms: resp.duration_ms,
            recording_url: clip_download_url(resp.recording_clip_id),
            analysis: resp.report.into(),
        }
    }
}
