//! Canonical 16-bit PCM WAV 编解码
//!
//! 输出布局（little-endian，44 字节头）：
//! RIFF / 36 + dataSize / WAVE / "fmt " / 16 / 1 / channels / rate /
//! byteRate / blockAlign / 16 / "data" / dataSize / interleaved i16

use super::errors::AudioError;
use super::sample::AudioSample;

pub const WAV_HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;

/// f32 → i16 线性量化
///
/// 先 clamp 到 [-1.0, 1.0]，非负值乘 0x7FFF，负值乘 0x8000，四舍五入
/// （.5 远离零）。1.0 → 0x7FFF，-1.0 → 0x8000。NaN 量化为 0。
///
/// 与 [`dequantize`] 互逆：任意 i16 经 dequantize → quantize 后不变。
pub fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s >= 0.0 {
        (s * 32767.0).round() as i16
    } else {
        (s * 32768.0).round() as i16
    }
}

/// i16 → f32，使用与 [`quantize`] 相同的非对称比例
pub fn dequantize(sample: i16) -> f32 {
    if sample >= 0 {
        sample as f32 / 32767.0
    } else {
        sample as f32 / 32768.0
    }
}

/// 计算 16-bit PCM 数据段字节数
///
/// RIFF 长度字段为 u32，数据段加 36 字节头部后不能溢出
pub fn wav_data_size(frames: usize, channels: usize) -> Result<u32, AudioError> {
    let size = frames as u128 * channels as u128 * (BITS_PER_SAMPLE / 8) as u128;
    if size > (u32::MAX - 36) as u128 {
        return Err(AudioError::DataTooLarge(size));
    }
    Ok(size as u32)
}

/// 将 interleaved f32 样本编码为 WAV
pub fn encode_wav(
    sample_rate: u32,
    num_channels: u16,
    interleaved: &[f32],
) -> Result<Vec<u8>, AudioError> {
    if num_channels == 0 {
        return Err(AudioError::NoChannels);
    }
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate(sample_rate));
    }
    if interleaved.len() % num_channels as usize != 0 {
        return Err(AudioError::PartialFrame {
            samples: interleaved.len(),
            channels: num_channels as usize,
        });
    }

    let bytes_per_sample = (BITS_PER_SAMPLE / 8) as u32;
    let byte_rate = sample_rate
        .checked_mul(num_channels as u32 * bytes_per_sample)
        .ok_or_else(|| AudioError::InvalidWav(format!("byte rate overflow at {} Hz", sample_rate)))?;
    let block_align = num_channels * (BITS_PER_SAMPLE / 8);

    let frames = interleaved.len() / num_channels as usize;
    let data_size = wav_data_size(frames, num_channels as usize)? as usize;
    let riff_size = data_size as u32 + 36;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for &sample in interleaved {
        wav.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    Ok(wav)
}

/// 交织并编码整个 AudioSample
pub fn encode_sample(sample: &AudioSample) -> Result<Vec<u8>, AudioError> {
    let channels = u16::try_from(sample.channel_count())
        .map_err(|_| AudioError::TooManyChannels(sample.channel_count()))?;
    encode_wav(sample.sample_rate(), channels, &sample.interleave())
}

/// WAV 头信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    pub audio_format: u16,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_offset: usize,
    pub data_size: usize,
    pub duration_ms: u64,
}

/// 解析 WAV 文件头（遍历 chunk，跳过未知 chunk）
pub fn parse_wav_header(data: &[u8]) -> Result<WavInfo, AudioError> {
    if data.len() < 12 {
        return Err(AudioError::InvalidWav("data too short".to_string()));
    }
    if &data[0..4] != b"RIFF" {
        return Err(AudioError::InvalidWav("missing RIFF header".to_string()));
    }
    if &data[8..12] != b"WAVE" {
        return Err(AudioError::InvalidWav("missing WAVE identifier".to_string()));
    }

    let read_u16 = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);
    let read_u32 =
        |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32(pos + 4) as usize;
        let body = pos + 8;

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 || body + 16 > data.len() {
                    return Err(AudioError::InvalidWav("truncated fmt chunk".to_string()));
                }
                fmt = Some((
                    read_u16(body),
                    read_u16(body + 2),
                    read_u32(body + 4),
                    read_u16(body + 14),
                ));
            }
            b"data" => {
                let (audio_format, channels, sample_rate, bits_per_sample) = fmt
                    .ok_or_else(|| AudioError::InvalidWav("data chunk before fmt".to_string()))?;
                if body + chunk_size > data.len() {
                    return Err(AudioError::InvalidWav("truncated data chunk".to_string()));
                }

                let frame_bytes = channels as usize * (bits_per_sample as usize / 8);
                let duration_ms = if frame_bytes > 0 && sample_rate > 0 {
                    (chunk_size / frame_bytes) as u64 * 1000 / sample_rate as u64
                } else {
                    0
                };

                return Ok(WavInfo {
                    audio_format,
                    sample_rate,
                    channels,
                    bits_per_sample,
                    data_offset: body,
                    data_size: chunk_size,
                    duration_ms,
                });
            }
            _ => {}
        }

        // 对齐到偶数字节
        pos = body + chunk_size + (chunk_size % 2);
    }

    Err(AudioError::InvalidWav(match fmt {
        Some(_) => "missing data chunk".to_string(),
        None => "missing fmt chunk".to_string(),
    }))
}
