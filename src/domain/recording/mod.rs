//! Recording Context - 录音会话限界上下文
//!
//! 职责:
//! - 麦克风采集的帧缓冲（start / pause / resume / stop）
//! - 停止时导出采集采样率的 WAV

mod errors;
mod session;

pub use errors::RecordingError;
pub use session::{RecordingId, RecordingSession, RecordingState, RECORDED_FILE_NAME};
