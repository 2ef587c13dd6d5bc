//! Metadata Adapter - 元数据来源实现

mod file_metadata_source;
mod http_metadata_source;

pub use file_metadata_source::FileMetadataSource;
pub use http_metadata_source::HttpMetadataSource;
