//! Memory Layer - In-Memory State Management
//!
//! 实现 RecordingManager 和 ClipStore，管理录音会话与待下载音频的内存状态

mod clip_store;
mod recording_manager;

pub use clip_store::InMemoryClipStore;
pub use recording_manager::InMemoryRecordingManager;
