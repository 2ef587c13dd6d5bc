//! Metadata Source Port - 元数据文本来源

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::metadata::MetadataTable;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to fetch metadata: {0}")]
    FetchError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Metadata file is empty or malformed")]
    Empty,
}

/// Metadata Source Port
///
/// 只读；每次调用都重新读取，不做缓存
#[async_trait]
pub trait MetadataSourcePort: Send + Sync {
    async fn fetch(&self) -> Result<MetadataTable, MetadataError>;

    /// 来源描述（URL 或路径），用于日志
    fn describe(&self) -> String;
}
