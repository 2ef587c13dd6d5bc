//! Metadata Queries

/// 读取完整元数据表
#[derive(Debug, Clone, Default)]
pub struct GetMetadata;
