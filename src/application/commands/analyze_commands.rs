//! Analyze Commands - 音频上传分析

use crate::domain::audio::EncodedAudioBlob;

/// 分析一批音频（上传到分类服务）
#[derive(Debug, Clone)]
pub struct AnalyzeAudio {
    /// 按上传顺序排列的音频
    pub clips: Vec<EncodedAudioBlob>,
}

/// 将单个音频重采样为 16-bit PCM WAV
#[derive(Debug, Clone)]
pub struct ResampleAudio {
    pub clip: EncodedAudioBlob,
    /// 为空时使用配置的目标采样率
    pub target_rate: Option<u32>,
}
