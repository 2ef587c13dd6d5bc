//! Recording Context - Errors

use thiserror::Error;

use super::RecordingState;
use crate::domain::audio::AudioError;

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Recording not found: {0}")]
    NotFound(String),

    #[error("Invalid capture format: {sample_rate} Hz, {channels} channels")]
    InvalidFormat { sample_rate: u32, channels: u16 },

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: RecordingState,
        action: &'static str,
    },

    #[error("{samples} samples do not divide into {channels} channels")]
    PartialFrame { samples: usize, channels: usize },

    #[error("Recording exceeds {max_frames} frames")]
    CapacityExceeded { max_frames: usize },

    #[error("The audio file is empty")]
    Empty,

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}
