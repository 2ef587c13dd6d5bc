//! Recording Manager Port - 录音会话生命周期管理
//!
//! 每个会话由管理器独占持有，具体实现在 infrastructure/memory 层

use crate::domain::recording::{RecordingError, RecordingId, RecordingSession, RecordingState};

/// 会话状态快照
#[derive(Debug, Clone)]
pub struct RecordingStatus {
    pub id: RecordingId,
    pub state: RecordingState,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub duration_ms: u64,
}

impl From<&RecordingSession> for RecordingStatus {
    fn from(session: &RecordingSession) -> Self {
        Self {
            id: session.id(),
            state: session.state(),
            sample_rate: session.sample_rate(),
            channels: session.channel_count(),
            frames: session.frames(),
            duration_ms: session.duration_ms(),
        }
    }
}

/// Recording Manager Port
pub trait RecordingManagerPort: Send + Sync {
    /// 注册新会话
    fn insert(&self, session: RecordingSession) -> Result<RecordingId, RecordingError>;

    /// 获取会话状态
    fn status(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError>;

    /// 写入帧，返回接收的帧数
    fn append(&self, id: RecordingId, samples: &[f32]) -> Result<usize, RecordingError>;

    fn pause(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError>;

    fn resume(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError>;

    /// 移除并返回会话（停止录音）
    fn take(&self, id: RecordingId) -> Result<RecordingSession, RecordingError>;

    /// 获取空闲超时的会话
    fn get_expired(&self, idle_timeout_secs: u64) -> Vec<RecordingId>;

    /// 丢弃会话，不导出
    fn discard(&self, id: RecordingId) -> bool;

    fn len(&self) -> usize;
}
