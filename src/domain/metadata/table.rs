//! Metadata Context - 元数据表解析与查找
//!
//! 文件格式：每行一条记录，`;` 分隔，固定三列
//! `name;extension;compression`。每列去除首尾空白，name 统一转小写。
//! 空行与列数不为 3 的行被跳过；首行若为 `name;extension;compression`
//! 则视为表头。

use serde::Serialize;

/// 查找不到时的占位值
pub const NOT_AVAILABLE: &str = "N/A";

const FIELD_SEPARATOR: char = ';';
const HEADER: [&str; 3] = ["name", "extension", "compression"];

/// 单条元数据记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// 小写文件名
    pub name: String,
    pub extension: String,
    pub compression: String,
}

/// 展示用的一行（文件名保留原始大小写）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRow {
    pub file_name: String,
    pub extension: String,
    pub compression: String,
}

/// 元数据表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    records: Vec<MetadataRecord>,
}

impl MetadataTable {
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        Self { records }
    }

    /// 解析元数据文本，无效行直接跳过
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty()).peekable();

        if let Some(first) = lines.peek() {
            if is_header(first) {
                lines.next();
            }
        }

        let records = lines.filter_map(parse_line).collect();
        Self { records }
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按文件名查找（忽略大小写与首尾空白），返回首个匹配
    pub fn find(&self, file_name: &str) -> Option<&MetadataRecord> {
        let key = file_name.trim().to_lowercase();
        self.records.iter().find(|r| r.name == key)
    }

    /// 生成展示行，缺失字段填 `N/A`
    pub fn row_for(&self, file_name: &str) -> MetadataRow {
        match self.find(file_name) {
            Some(record) => MetadataRow {
                file_name: file_name.to_string(),
                extension: record.extension.clone(),
                compression: record.compression.clone(),
            },
            None => MetadataRow {
                file_name: file_name.to_string(),
                extension: NOT_AVAILABLE.to_string(),
                compression: NOT_AVAILABLE.to_string(),
            },
        }
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).map(str::trim).collect()
}

fn is_header(line: &str) -> bool {
    let fields = split_fields(line);
    fields.len() == HEADER.len()
        && fields
            .iter()
            .zip(HEADER)
            .all(|(field, expected)| field.eq_ignore_ascii_case(expected))
}

fn parse_line(line: &str) -> Option<MetadataRecord> {
    match split_fields(line).as_slice() {
        [name, extension, compression] => Some(MetadataRecord {
            name: name.to_lowercase(),
            extension: extension.to_string(),
            compression: compression.to_string(),
        }),
        _ => None,
    }
}
