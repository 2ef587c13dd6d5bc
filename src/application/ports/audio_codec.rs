//! Audio Codec Port - 解码 / 重采样能力抽象
//!
//! 容器解码与离线渲染（重采样）由具体音频库实现，
//! WAV 序列化不依赖于此端口。

use thiserror::Error;

use crate::domain::audio::{AudioSample, EncodedAudioBlob};

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Audio Codec Port
///
/// 实现必须是确定性的，且不持有跨调用的可变状态
pub trait AudioCodecPort: Send + Sync {
    /// 将容器解析为 PCM 数据
    fn decode(&self, blob: &EncodedAudioBlob) -> Result<AudioSample, CodecError>;

    /// 渲染到目标采样率
    ///
    /// 输出帧数为 `ceil(frames × target_rate / sample_rate)`，声道数不变，
    /// 输出值不超出输入信号的取值范围
    fn render(&self, sample: &AudioSample, target_rate: u32) -> Result<AudioSample, CodecError>;
}
