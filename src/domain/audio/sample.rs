//! Audio Context - AudioSample 值对象

use super::errors::AudioError;

/// 重采样后的帧数：`ceil(frames × to_rate / from_rate)`
pub fn resampled_len(frames: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == 0 {
        return 0;
    }
    let from = from_rate as u128;
    ((frames as u128 * to_rate as u128 + from - 1) / from) as usize
}

/// 解码后的非压缩多声道音频
///
/// 不变量:
/// - sample_rate > 0
/// - 至少一个声道
/// - 所有声道长度相同
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioSample {
    /// 从 planar 数据创建（每个声道一个 Vec）
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        let Some(first) = channels.first() else {
            return Err(AudioError::NoChannels);
        };
        let frames = first.len();
        if let Some((index, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frames)
        {
            return Err(AudioError::ChannelLengthMismatch {
                channel: index,
                expected: frames,
                actual: ch.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// 单声道便捷构造
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, AudioError> {
        Self::new(sample_rate, vec![samples])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 每声道帧数
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// 时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        (self.frames() as u64 * 1000) / self.sample_rate as u64
    }

    /// 交织为 `sample[frame * channels + channel]`
    pub fn interleave(&self) -> Vec<f32> {
        let channel_count = self.channel_count();
        let mut out = Vec::with_capacity(self.frames() * channel_count);
        for frame in 0..self.frames() {
            for ch in &self.channels {
                out.push(ch[frame]);
            }
        }
        out
    }
}
