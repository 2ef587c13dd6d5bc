//! Audio Context - EncodedAudioBlob 值对象

use std::path::Path;
use std::sync::Arc;

pub const WAV_MIME: &str = "audio/wav";

/// 编码后的音频数据（自描述容器，例如 WAV / FLAC）
///
/// 创建后不可变，clone 只增加引用计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudioBlob {
    data: Arc<[u8]>,
    mime_type: String,
    file_name: Option<String>,
}

impl EncodedAudioBlob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn wav(data: Vec<u8>) -> Self {
        Self::new(data, WAV_MIME)
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// 小写扩展名（来自文件名）
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// 同名 `.wav` 文件名，用于重编码后的输出
    pub fn wav_file_name(&self) -> Option<String> {
        self.file_name.as_deref().map(|name| {
            let stem = Path::new(name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(name);
            format!("{}.wav", stem)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_and_wav_name() {
        let blob = EncodedAudioBlob::new(vec![1u8, 2, 3], "audio/flac").with_file_name("T_01.FLAC");
        assert_eq!(blob.extension().as_deref(), Some("flac"));
        assert_eq!(blob.wav_file_name().as_deref(), Some("T_01.wav"));
        assert_eq!(blob.len(), 3);
    }

    #[test]
    fn test_unnamed_blob() {
        let blob = EncodedAudioBlob::wav(Vec::new());
        assert!(blob.is_empty());
        assert_eq!(blob.mime_type(), WAV_MIME);
        assert_eq!(blob.extension(), None);
        assert_eq!(blob.wav_file_name(), None);
    }
}
