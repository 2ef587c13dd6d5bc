//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Audio must have at least one channel")]
    NoChannels,

    #[error("Channel {channel} has {actual} frames, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{samples} samples do not divide into {channels} channels")]
    PartialFrame { samples: usize, channels: usize },

    #[error("Too many channels for WAV: {0}")]
    TooManyChannels(usize),

    #[error("WAV data too large: {0} bytes")]
    DataTooLarge(u128),

    #[error("Invalid WAV: {0}")]
    InvalidWav(String),
}
