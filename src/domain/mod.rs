//! Domain Layer - 领域层
//!
//! 包含四个限界上下文:
//! - Audio Context: PCM 数据与 WAV 编码
//! - Metadata Context: 文件元数据表
//! - Prediction Context: 分类结果
//! - Recording Context: 录音会话

pub mod audio;
pub mod metadata;
pub mod prediction;
pub mod recording;
