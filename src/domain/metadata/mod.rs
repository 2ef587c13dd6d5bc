//! Metadata Context - 文件元数据限界上下文
//!
//! 只读的扁平文本元数据（文件名 → 扩展名 / 压缩方式）

mod table;

pub use table::{MetadataRecord, MetadataRow, MetadataTable, NOT_AVAILABLE};
