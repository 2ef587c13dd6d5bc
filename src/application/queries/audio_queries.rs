//! Audio Queries - 已上传音频与录音状态查询

use uuid::Uuid;

use crate::domain::recording::RecordingId;

/// 获取已存储的音频（下载）
#[derive(Debug, Clone)]
pub struct GetClip {
    pub clip_id: Uuid,
}

/// 获取录音会话状态
#[derive(Debug, Clone)]
pub struct GetRecording {
    pub recording_id: RecordingId,
}
