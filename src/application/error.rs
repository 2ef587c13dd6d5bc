//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ClassifierError, MetadataError};
use crate::application::resampler::ResampleError;
use crate::domain::recording::RecordingError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 音频处理错误（解码 / 重采样 / 编码）
    #[error("Audio processing error: {0}")]
    AudioError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<ResampleError> for ApplicationError {
    fn from(err: ResampleError) -> Self {
        match err {
            ResampleError::EmptyInput | ResampleError::InvalidTargetRate(_) => {
                Self::ValidationError(err.to_string())
            }
            _ => Self::AudioError(err.to_string()),
        }
    }
}

impl From<RecordingError> for ApplicationError {
    fn from(err: RecordingError) -> Self {
        match err {
            RecordingError::NotFound(id) => Self::NotFound {
                resource_type: "Recording",
                id,
            },
            RecordingError::InvalidTransition { .. } => Self::InvalidState(err.to_string()),
            RecordingError::Audio(_) => Self::AudioError(err.to_string()),
            _ => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<ClassifierError> for ApplicationError {
    fn from(err: ClassifierError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<MetadataError> for ApplicationError {
    fn from(err: MetadataError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}
