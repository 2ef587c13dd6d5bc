//! File Metadata Source - 从本地文件读取元数据文本

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{MetadataError, MetadataSourcePort};
use crate::domain::metadata::MetadataTable;

pub struct FileMetadataSource {
    path: PathBuf,
}

impl FileMetadataSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl MetadataSourcePort for FileMetadataSource {
    async fn fetch(&self) -> Result<MetadataTable, MetadataError> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|e| MetadataError::IoError(format!("{}: {}", self.path.display(), e)))?;

        if text.trim().is_empty() {
            return Err(MetadataError::Empty);
        }

        Ok(MetadataTable::parse(&text))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
