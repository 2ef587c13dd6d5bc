//! Symphonia Codec - 基于 symphonia 的解码 + 线性插值重采样
//!
//! 支持：
//! - WAV / FLAC / OGG Vorbis / MP3 容器解码
//! - 16-bit PCM 按 [`dequantize`] 精确还原，重新编码时逐字节一致
//! - 线性插值重采样（输出为相邻两点的凸组合，不会超出原信号范围）

use std::io::Cursor;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioCodecPort, CodecError};
use crate::domain::audio::{
    dequantize, resampled_len, wav_data_size, AudioSample, EncodedAudioBlob,
};

/// Symphonia 编解码器
///
/// 无内部状态，每次调用创建并释放自己的解码器
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaCodec;

impl SymphoniaCodec {
    pub fn new() -> Self {
        Self
    }

    fn hint_for(blob: &EncodedAudioBlob) -> Hint {
        let mut hint = Hint::new();
        if let Some(ext) = blob.extension() {
            hint.with_extension(&ext);
        }
        if !blob.mime_type().is_empty() {
            hint.mime_type(blob.mime_type());
        }
        hint
    }
}

/// 按声道累积解码结果
struct PlanarAccumulator {
    channels: Vec<Vec<f32>>,
    sample_rate: Option<u32>,
    skipped_packets: usize,
}

impl PlanarAccumulator {
    fn new(channel_count: Option<usize>, sample_rate: Option<u32>) -> Self {
        Self {
            channels: vec![Vec::new(); channel_count.unwrap_or(0)],
            sample_rate,
            skipped_packets: 0,
        }
    }

    /// 跳过无法解码的单个数据包
    fn skip(&mut self, reason: &dyn std::fmt::Display) {
        self.skipped_packets += 1;
        tracing::warn!(skipped = self.skipped_packets, "Decode error (skipping packet): {}", reason);
    }

    fn push(&mut self, decoded: AudioBufferRef<'_>) -> Result<(), CodecError> {
        let spec = *decoded.spec();
        let channel_count = spec.channels.count();

        if self.channels.is_empty() {
            self.channels = vec![Vec::new(); channel_count];
        }
        if self.channels.len() != channel_count {
            return Err(CodecError::DecodingError(format!(
                "Channel count changed mid-stream: {} -> {}",
                self.channels.len(),
                channel_count
            )));
        }
        self.sample_rate.get_or_insert(spec.rate);

        match decoded {
            AudioBufferRef::S16(buf) => {
                for (ch, out) in self.channels.iter_mut().enumerate() {
                    out.extend(buf.chan(ch).iter().map(|&s| dequantize(s)));
                }
            }
            other => {
                let frames = other.frames();
                let mut sample_buf = SampleBuffer::<f32>::new(frames as u64, spec);
                sample_buf.copy_interleaved_ref(other);
                // 只取实际样本，不取整个缓冲区容量
                let actual = frames * channel_count;
                for frame in sample_buf.samples()[..actual].chunks_exact(channel_count) {
                    for (out, &s) in self.channels.iter_mut().zip(frame) {
                        out.push(s);
                    }
                }
            }
        }
        Ok(())
    }

    /// 有数据包解码失败且没有得到任何帧时视为整体解码失败
    fn finish(self) -> Result<AudioSample, CodecError> {
        let decoded_frames = self.channels.first().map_or(0, Vec::len);
        if self.skipped_packets > 0 && decoded_frames == 0 {
            return Err(CodecError::DecodingError(format!(
                "All {} packets failed to decode",
                self.skipped_packets
            )));
        }
        let sample_rate = self
            .sample_rate
            .ok_or_else(|| CodecError::DecodingError("Unknown sample rate".to_string()))?;
        if self.channels.is_empty() {
            return Err(CodecError::DecodingError("Unknown channel count".to_string()));
        }
        AudioSample::new(sample_rate, self.channels)
            .map_err(|e| CodecError::DecodingError(e.to_string()))
    }
}

impl AudioCodecPort for SymphoniaCodec {
    fn decode(&self, blob: &EncodedAudioBlob) -> Result<AudioSample, CodecError> {
        let cursor = Cursor::new(blob.bytes().to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Self::hint_for(blob),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => CodecError::UnsupportedFormat(what.to_string()),
                other => CodecError::DecodingError(format!("Probe failed: {}", other)),
            })?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| CodecError::DecodingError("No audio track found".to_string()))?;

        let mut accumulator = PlanarAccumulator::new(
            track.codec_params.channels.map(|c| c.count()),
            track.codec_params.sample_rate,
        );

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => CodecError::UnsupportedFormat(what.to_string()),
                other => CodecError::DecodingError(format!("Decoder creation failed: {}", other)),
            })?;

        let track_id = track.id;

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => {
                    return Err(CodecError::DecodingError(format!("Packet read error: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => accumulator.push(decoded)?,
                Err(SymphoniaError::DecodeError(e)) => accumulator.skip(&e),
                Err(e) => {
                    return Err(CodecError::DecodingError(format!("Decode failed: {}", e)));
                }
            }
        }

        let sample = accumulator.finish()?;

        tracing::debug!(
            sample_rate = sample.sample_rate(),
            channels = sample.channel_count(),
            frames = sample.frames(),
            "Decoded audio"
        );

        Ok(sample)
    }

    fn render(&self, sample: &AudioSample, target_rate: u32) -> Result<AudioSample, CodecError> {
        if target_rate == 0 {
            return Err(CodecError::RenderError("Target sample rate must be positive".to_string()));
        }
        if sample.sample_rate() == target_rate {
            return Ok(sample.clone());
        }

        let from_rate = sample.sample_rate();
        let out_frames = resampled_len(sample.frames(), from_rate, target_rate);
        wav_data_size(out_frames, sample.channel_count())
            .map_err(|e| CodecError::RenderError(e.to_string()))?;

        let channels = sample
            .channels()
            .iter()
            .map(|ch| resample_linear(ch, from_rate, target_rate, out_frames))
            .collect();

        AudioSample::new(target_rate, channels).map_err(|e| CodecError::RenderError(e.to_string()))
    }
}

/// 单声道线性插值
///
/// 输出帧 i 对应源位置 `i × from / to`，用整数运算求整数部分和小数部分，
/// 保证同一输入总是得到同一输出
fn resample_linear(input: &[f32], from_rate: u32, to_rate: u32, out_frames: usize) -> Vec<f32> {
    let Some(&last) = input.last() else {
        return Vec::new();
    };
    let last_index = input.len() - 1;
    let from = from_rate as u64;
    let to = to_rate as u64;

    (0..out_frames as u64)
        .map(|i| {
            let pos = i * from;
            let idx = ((pos / to) as usize).min(last_index);
            let frac = (pos % to) as f32 / to as f32;

            let s0 = input[idx];
            let s1 = input.get(idx + 1).copied().unwrap_or(last);
            let value = s0 + (s1 - s0) * frac;
            // 浮点误差不得越过两个端点
            value.clamp(s0.min(s1), s0.max(s1))
        })
        .collect()
}
