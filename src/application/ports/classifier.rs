//! Classifier Port - 远程分类服务抽象
//!
//! 模型本身对本服务不可见，只约定上传与返回格式

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::EncodedAudioBlob;
use crate::domain::prediction::PredictionBatch;

/// 分类服务错误
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Server error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Classifier Port
#[async_trait]
pub trait ClassifierPort: Send + Sync {
    /// 批量上传音频，按上传顺序返回每个文件的结果
    async fn classify(&self, clips: &[EncodedAudioBlob]) -> Result<PredictionBatch, ClassifierError>;

    /// 检查分类服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
