//! Recording Command Handlers
//!
//! 录音会话状态机：start → (append / pause / resume)* → stop
//! stop 导出采集采样率的 WAV，然后交给 AnalyzeAudioHandler

use std::sync::Arc;

use uuid::Uuid;

use super::analyze_handlers::{AnalysisReport, AnalyzeAudioHandler};
use crate::application::commands::{
    AnalyzeAudio, AppendFrames, PauseRecording, ResumeRecording, StartRecording, StopRecording,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{ClipStorePort, RecordingManagerPort, RecordingStatus};
use crate::domain::recording::{RecordingId, RecordingSession};

// ============================================================================
// StartRecording
// ============================================================================

pub struct StartRecordingHandler {
    recordings: Arc<dyn RecordingManagerPort>,
    max_frames: usize,
}

impl StartRecordingHandler {
    pub fn new(recordings: Arc<dyn RecordingManagerPort>, max_frames: usize) -> Self {
        Self {
            recordings,
            max_frames,
        }
    }

    pub async fn handle(&self, command: StartRecording) -> Result<RecordingStatus, ApplicationError> {
        let session = RecordingSession::start(command.sample_rate, command.channels, self.max_frames)?;
        let id = self.recordings.insert(session)?;
        Ok(self.recordings.status(id)?)
    }
}

// ============================================================================
// AppendFrames
// ============================================================================

/// 写入结果
#[derive(Debug, Clone)]
pub struct AppendFramesResponse {
    /// 本次接收的帧数（暂停时为 0）
    pub accepted_frames: usize,
    pub status: RecordingStatus,
}

pub struct AppendFramesHandler {
    recordings: Arc<dyn RecordingManagerPort>,
}

impl AppendFramesHandler {
    pub fn new(recordings: Arc<dyn RecordingManagerPort>) -> Self {
        Self { recordings }
    }

    pub async fn handle(&self, command: AppendFrames) -> Result<AppendFramesResponse, ApplicationError> {
        let accepted_frames = self
            .recordings
            .append(command.recording_id, &command.samples)?;
        let status = self.recordings.status(command.recording_id)?;

        tracing::trace!(
            recording_id = %command.recording_id,
            accepted = accepted_frames,
            total = status.frames,
            "Frames appended"
        );

        Ok(AppendFramesResponse {
            accepted_frames,
            status,
        })
    }
}

// ============================================================================
// PauseRecording / ResumeRecording
// ============================================================================

pub struct PauseRecordingHandler {
    recordings: Arc<dyn RecordingManagerPort>,
}

impl PauseRecordingHandler {
    pub fn new(recordings: Arc<dyn RecordingManagerPort>) -> Self {
        Self { recordings }
    }

    pub async fn handle(&self, command: PauseRecording) -> Result<RecordingStatus, ApplicationError> {
        Ok(self.recordings.pause(command.recording_id)?)
    }
}

pub struct ResumeRecordingHandler {
    recordings: Arc<dyn RecordingManagerPort>,
}

impl ResumeRecordingHandler {
    pub fn new(recordings: Arc<dyn RecordingManagerPort>) -> Self {
        Self { recordings }
    }

    pub async fn handle(&self, command: ResumeRecording) -> Result<RecordingStatus, ApplicationError> {
        Ok(self.recordings.resume(command.recording_id)?)
    }
}

// ============================================================================
// StopRecording
// ============================================================================

/// 停止录音响应
#[derive(Debug, Clone)]
pub struct StopRecordingResponse {
    pub recording_id: RecordingId,
    pub duration_ms: u64,
    /// 采集采样率的录音（recorded-audio.wav）
    pub recording_clip_id: Uuid,
    pub report: AnalysisReport,
}

pub struct StopRecordingHandler {
    recordings: Arc<dyn RecordingManagerPort>,
    clip_store: Arc<dyn ClipStorePort>,
    analyze: Arc<AnalyzeAudioHandler>,
}

impl StopRecordingHandler {
    pub fn new(
        recordings: Arc<dyn RecordingManagerPort>,
        clip_store: Arc<dyn ClipStorePort>,
        analyze: Arc<AnalyzeAudioHandler>,
    ) -> Self {
        Self {
            recordings,
            clip_store,
            analyze,
        }
    }

    pub async fn handle(&self, command: StopRecording) -> Result<StopRecordingResponse, ApplicationError> {
        let session = self.recordings.take(command.recording_id)?;
        let duration_ms = session.duration_ms();

        let recorded = session.export_wav().map_err(|e| {
            tracing::warn!(recording_id = %command.recording_id, error = %e, "Recording export failed");
            ApplicationError::from(e)
        })?;

        let recording_clip_id = self.clip_store.put(recorded.clone());

        let report = self
            .analyze
            .handle(AnalyzeAudio {
                clips: vec![recorded],
            })
            .await?;

        Ok(StopRecordingResponse {
            recording_id: command.recording_id,
            duration_ms,
            recording_clip_id,
            report,
        })
    }
}
