//! Recording Commands - 麦克风录音会话

use crate::domain::recording::RecordingId;

/// 开始录音
#[derive(Debug, Clone)]
pub struct StartRecording {
    pub sample_rate: u32,
    pub channels: u16,
}

/// 写入一段 interleaved 采样
#[derive(Debug, Clone)]
pub struct AppendFrames {
    pub recording_id: RecordingId,
    pub samples: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct PauseRecording {
    pub recording_id: RecordingId,
}

#[derive(Debug, Clone)]
pub struct ResumeRecording {
    pub recording_id: RecordingId,
}

/// 停止录音，导出 WAV 并提交分析
#[derive(Debug, Clone)]
pub struct StopRecording {
    pub recording_id: RecordingId,
}
