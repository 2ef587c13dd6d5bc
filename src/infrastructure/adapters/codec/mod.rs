//! Codec Adapter - 音频解码与重采样

mod symphonia_codec;

pub use symphonia_codec::SymphoniaCodec;
