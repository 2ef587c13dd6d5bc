//! Metadata Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::MetadataSourcePort;
use crate::application::queries::GetMetadata;
use crate::domain::metadata::MetadataRecord;

/// GetMetadata Handler
///
/// 与分析流程不同，这里的读取失败会直接返回给调用方
pub struct GetMetadataHandler {
    source: Arc<dyn MetadataSourcePort>,
}

impl GetMetadataHandler {
    pub fn new(source: Arc<dyn MetadataSourcePort>) -> Self {
        Self { source }
    }

    pub async fn handle(&self, _query: GetMetadata) -> Result<Vec<MetadataRecord>, ApplicationError> {
        let table = self.source.fetch().await?;
        Ok(table.records().to_vec())
    }
}
