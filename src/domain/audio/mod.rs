//! Audio Context - 音频限界上下文
//!
//! 职责:
//! - 解码后 PCM 数据的表示（AudioSample）
//! - 编码后音频容器（EncodedAudioBlob）
//! - Canonical 16-bit PCM WAV 编码

mod blob;
mod errors;
mod sample;
pub mod wav;

pub use blob::{EncodedAudioBlob, WAV_MIME};
pub use errors::AudioError;
pub use sample::{resampled_len, AudioSample};
pub use wav::{dequantize, encode_sample, encode_wav, parse_wav_header, quantize, wav_data_size, WavInfo};
