//! Audio Resampler - 任意格式音频 → 固定采样率 16-bit PCM WAV
//!
//! 流程: decode → render → interleave → encode
//!
//! - 空输入在解码前直接拒绝
//! - 解码与渲染在阻塞线程池执行，所有缓冲区由单次调用独占
//! - 任一阶段失败都不返回部分结果

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::AudioCodecPort;
use crate::domain::audio::{
    encode_wav, resampled_len, wav_data_size, AudioSample, EncodedAudioBlob,
};

/// 默认目标采样率（Hz）
pub const DEFAULT_TARGET_RATE: u32 = 16000;

/// 允许的最高目标采样率（Hz）
pub const MAX_TARGET_RATE: u32 = 384_000;

/// 重采样错误
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("Input audio is empty")]
    EmptyInput,

    #[error("Invalid target sample rate: {0}")]
    InvalidTargetRate(u32),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Encode error: {0}")]
    Encode(String),
}

/// 重采样请求
#[derive(Debug, Clone)]
pub struct ResampleRequest {
    pub blob: EncodedAudioBlob,
    pub target_rate: u32,
}

impl ResampleRequest {
    pub fn new(blob: EncodedAudioBlob) -> Self {
        Self {
            blob,
            target_rate: DEFAULT_TARGET_RATE,
        }
    }

    pub fn with_target_rate(mut self, target_rate: u32) -> Self {
        self.target_rate = target_rate;
        self
    }
}

/// 重采样器
///
/// 无状态，可在多个请求间共享
#[derive(Clone)]
pub struct AudioResampler {
    codec: Arc<dyn AudioCodecPort>,
}

impl AudioResampler {
    pub fn new(codec: Arc<dyn AudioCodecPort>) -> Self {
        Self { codec }
    }

    pub async fn resample(&self, request: ResampleRequest) -> Result<EncodedAudioBlob, ResampleError> {
        let ResampleRequest { blob, target_rate } = request;

        if blob.is_empty() {
            return Err(ResampleError::EmptyInput);
        }
        if target_rate == 0 || target_rate > MAX_TARGET_RATE {
            return Err(ResampleError::InvalidTargetRate(target_rate));
        }

        let output_name = blob.wav_file_name();
        let input_size = blob.len();
        let codec = self.codec.clone();

        let wav = tokio::task::spawn_blocking(move || transcode(codec.as_ref(), &blob, target_rate))
            .await
            .map_err(|e| ResampleError::Render(format!("Resample task failed: {}", e)))??;

        tracing::debug!(
            input_size = input_size,
            output_size = wav.len(),
            target_rate = target_rate,
            "Resampled audio to WAV"
        );

        let output = EncodedAudioBlob::wav(wav);
        Ok(match output_name {
            Some(name) => output.with_file_name(name),
            None => output,
        })
    }
}

/// 同步执行完整流程
fn transcode(
    codec: &dyn AudioCodecPort,
    blob: &EncodedAudioBlob,
    target_rate: u32,
) -> Result<Vec<u8>, ResampleError> {
    let decoded = codec
        .decode(blob)
        .map_err(|e| ResampleError::Decode(e.to_string()))?;

    // 渲染前确认输出能放进单个 WAV，避免按超大帧数分配缓冲区
    let out_frames = resampled_len(decoded.frames(), decoded.sample_rate(), target_rate);
    wav_data_size(out_frames, decoded.channel_count())
        .map_err(|e| ResampleError::Encode(e.to_string()))?;

    let rendered = codec
        .render(&decoded, target_rate)
        .map_err(|e| ResampleError::Render(e.to_string()))?;
    check_rendered(&decoded, &rendered, target_rate)?;

    let channels = u16::try_from(rendered.channel_count())
        .map_err(|_| ResampleError::Encode(format!("{} channels", rendered.channel_count())))?;
    let interleaved = rendered.interleave();

    encode_wav(target_rate, channels, &interleaved).map_err(|e| ResampleError::Encode(e.to_string()))
}

/// 渲染结果必须满足采样率、声道数和帧数约定
fn check_rendered(
    input: &AudioSample,
    output: &AudioSample,
    target_rate: u32,
) -> Result<(), ResampleError> {
    let expected_frames = resampled_len(input.frames(), input.sample_rate(), target_rate);

    if output.sample_rate() != target_rate
        || output.channel_count() != input.channel_count()
        || output.frames() != expected_frames
    {
        return Err(ResampleError::Render(format!(
            "renderer produced {} Hz / {} ch / {} frames, expected {} Hz / {} ch / {} frames",
            output.sample_rate(),
            output.channel_count(),
            output.frames(),
            target_rate,
            input.channel_count(),
            expected_frames
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CodecError;
    use crate::domain::audio::{encode_sample, parse_wav_header, WAV_MIME};
    use crate::infrastructure::adapters::SymphoniaCodec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数，渲染时直接截断/补零
    struct CountingCodec {
        decodes: AtomicUsize,
        sample: AudioSample,
    }

    impl AudioCodecPort for CountingCodec {
        fn decode(&self, _blob: &EncodedAudioBlob) -> Result<AudioSample, CodecError> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            Ok(self.sample.clone())
        }

        fn render(&self, sample: &AudioSample, target_rate: u32) -> Result<AudioSample, CodecError> {
            let frames = resampled_len(sample.frames(), sample.sample_rate(), target_rate);
            let channels = sample
                .channels()
                .iter()
                .map(|ch| {
                    let mut out = ch.clone();
                    out.resize(frames, 0.0);
                    out
                })
                .collect();
            AudioSample::new(target_rate, channels).map_err(|e| CodecError::RenderError(e.to_string()))
        }
    }

    /// 渲染结果帧数错误
    struct BrokenCodec;

    impl AudioCodecPort for BrokenCodec {
        fn decode(&self, _blob: &EncodedAudioBlob) -> Result<AudioSample, CodecError> {
            Ok(AudioSample::mono(8000, vec![0.0; 80]).unwrap())
        }

        fn render(&self, _sample: &AudioSample, target_rate: u32) -> Result<AudioSample, CodecError> {
            Ok(AudioSample::mono(target_rate, vec![0.0; 3]).unwrap())
        }
    }

    fn symphonia_resampler() -> AudioResampler {
        AudioResampler::new(Arc::new(SymphoniaCodec::new()))
    }

    fn sine(rate: u32, frames: usize, freq: f32, amplitude: f32) -> Vec<f32> {
        (0..frames)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    fn wav_blob(sample: &AudioSample, name: &str) -> EncodedAudioBlob {
        EncodedAudioBlob::wav(encode_sample(sample).unwrap()).with_file_name(name)
    }

    fn pcm_data(wav: &[u8]) -> Vec<i16> {
        let info = parse_wav_header(wav).unwrap();
        wav[info.data_offset..info.data_offset + info.data_size]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_decode() {
        let codec = Arc::new(CountingCodec {
            decodes: AtomicUsize::new(0),
            sample: AudioSample::mono(8000, vec![0.0; 8]).unwrap(),
        });
        let resampler = AudioResampler::new(codec.clone());

        let result = resampler
            .resample(ResampleRequest::new(EncodedAudioBlob::wav(Vec::new())))
            .await;
        assert!(matches!(result, Err(ResampleError::EmptyInput)));
        assert_eq!(codec.decodes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_target_rate_rejected() {
        let result = symphonia_resampler()
            .resample(ResampleRequest::new(EncodedAudioBlob::wav(vec![0u8; 8])).with_target_rate(0))
            .await;
        assert!(matches!(result, Err(ResampleError::InvalidTargetRate(0))));
    }

    #[tokio::test]
    async fn test_target_rate_above_limit_rejected() {
        let sample = AudioSample::mono(8000, vec![0.1; 80_000]).unwrap();
        let blob = wav_blob(&sample, "long.wav");

        for rate in [MAX_TARGET_RATE + 1, u32::MAX] {
            let result = symphonia_resampler()
                .resample(ResampleRequest::new(blob.clone()).with_target_rate(rate))
                .await;
            assert!(
                matches!(result, Err(ResampleError::InvalidTargetRate(r)) if r == rate),
                "rate {}",
                rate
            );
        }
    }

    #[test]
    fn test_oversized_output_fails_before_render() {
        // 渲染器一旦被调用即 panic
        struct HugeCodec;

        impl AudioCodecPort for HugeCodec {
            fn decode(&self, _blob: &EncodedAudioBlob) -> Result<AudioSample, CodecError> {
                AudioSample::mono(8000, vec![0.0; 8000])
                    .map_err(|e| CodecError::DecodingError(e.to_string()))
            }

            fn render(&self, _sample: &AudioSample, _target_rate: u32) -> Result<AudioSample, CodecError> {
                panic!("render must not run for oversized output");
            }
        }

        let result = transcode(
            &HugeCodec,
            &EncodedAudioBlob::wav(vec![1u8; 4]),
            u32::MAX,
        );
        assert!(matches!(result, Err(ResampleError::Encode(_))));
    }

    #[tokio::test]
    async fn test_garbage_input_is_decode_error() {
        let blob = EncodedAudioBlob::new(b"definitely not audio".to_vec(), "audio/webm")
            .with_file_name("clip.webm");
        let result = symphonia_resampler().resample(ResampleRequest::new(blob)).await;
        assert!(matches!(result, Err(ResampleError::Decode(_))));
    }

    #[tokio::test]
    async fn test_render_contract_violation_is_render_error() {
        let resampler = AudioResampler::new(Arc::new(BrokenCodec));
        let result = resampler
            .resample(ResampleRequest::new(EncodedAudioBlob::wav(vec![1u8; 4])))
            .await;
        assert!(matches!(result, Err(ResampleError::Render(_))));
    }

    #[tokio::test]
    async fn test_sine_44100_to_16000() {
        let sample = AudioSample::mono(44100, sine(44100, 44100, 440.0, 0.8)).unwrap();
        let blob = wav_blob(&sample, "tone.flac");

        let output = symphonia_resampler()
            .resample(ResampleRequest::new(blob))
            .await
            .unwrap();

        assert_eq!(output.mime_type(), WAV_MIME);
        assert_eq!(output.file_name(), Some("tone.wav"));

        let info = parse_wav_header(output.bytes()).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.data_size, 16000 * 2);

        // 线性插值不会超出原信号幅度
        let peak = pcm_data(output.bytes()).iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= (0.8 * 32768.0) as u16 + 1);
    }

    #[tokio::test]
    async fn test_output_length_is_ceiling() {
        for (rate, frames) in [(48000u32, 100usize), (22050, 1001), (8000, 3), (44100, 1)] {
            let sample = AudioSample::mono(rate, sine(rate, frames, 200.0, 0.5)).unwrap();
            let output = symphonia_resampler()
                .resample(ResampleRequest::new(wav_blob(&sample, "a.wav")))
                .await
                .unwrap();
            let info = parse_wav_header(output.bytes()).unwrap();
            assert_eq!(info.data_size / 2, resampled_len(frames, rate, 16000), "rate {}", rate);
        }
    }

    #[tokio::test]
    async fn test_same_rate_is_byte_identical() {
        let sample = AudioSample::new(
            16000,
            vec![sine(16000, 1600, 300.0, 0.7), sine(16000, 1600, 500.0, -0.4)],
        )
        .unwrap();
        let direct = encode_sample(&sample).unwrap();

        let output = symphonia_resampler()
            .resample(ResampleRequest::new(EncodedAudioBlob::wav(direct.clone())))
            .await
            .unwrap();
        assert_eq!(output.bytes(), direct.as_slice());

        // 再来一次结果不变
        let again = symphonia_resampler()
            .resample(ResampleRequest::new(output.clone()))
            .await
            .unwrap();
        assert_eq!(again.bytes(), output.bytes());
    }

    #[tokio::test]
    async fn test_stereo_interleaving_preserved() {
        let sample =
            AudioSample::new(16000, vec![vec![0.5, 0.25, 0.0], vec![-0.5, -0.25, 0.0]]).unwrap();
        let output = symphonia_resampler()
            .resample(ResampleRequest::new(wav_blob(&sample, "s.wav")))
            .await
            .unwrap();

        let data = pcm_data(output.bytes());
        assert_eq!(parse_wav_header(output.bytes()).unwrap().channels, 2);
        assert_eq!(&data[..3], &[16384, -16384, 8192]);
    }

    #[tokio::test]
    async fn test_input_blob_is_untouched() {
        let sample = AudioSample::mono(32000, sine(32000, 320, 100.0, 0.3)).unwrap();
        let blob = wav_blob(&sample, "in.wav");
        let before = blob.bytes().to_vec();

        let _ = symphonia_resampler()
            .resample(ResampleRequest::new(blob.clone()))
            .await
            .unwrap();
        assert_eq!(blob.bytes(), before.as_slice());
    }

    #[tokio::test]
    async fn test_concurrent_requests_do_not_interfere() {
        let resampler = symphonia_resampler();
        let a = AudioSample::mono(48000, vec![0.5; 4800]).unwrap();
        let b = AudioSample::mono(8000, vec![-0.25; 800]).unwrap();

        let (out_a, out_b) = tokio::join!(
            resampler.resample(ResampleRequest::new(wav_blob(&a, "a.wav"))),
            resampler.resample(ResampleRequest::new(wav_blob(&b, "b.wav"))),
        );
        let data_a = pcm_data(out_a.unwrap().bytes());
        let data_b = pcm_data(out_b.unwrap().bytes());
        assert_eq!(data_a.len(), 1600);
        assert_eq!(data_b.len(), 1600);
        assert!(data_a.iter().all(|&s| s == 16384));
        assert!(data_b.iter().all(|&s| s == -8192));
    }
}
