//! Recording Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordingError;
use crate::domain::audio::{encode_wav, EncodedAudioBlob};

/// 录音导出的默认文件名
pub const RECORDED_FILE_NAME: &str = "recorded-audio.wav";

/// 录音会话唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingId(Uuid);

impl RecordingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Recording,
    Paused,
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingState::Recording => write!(f, "recording"),
            RecordingState::Paused => write!(f, "paused"),
        }
    }
}

/// 录音会话聚合根
///
/// 不变量:
/// - 缓冲区始终是完整帧（长度是 channel_count 的倍数）
/// - 只有 Recording 状态下才接收帧
/// - 帧数不超过 max_frames
/// - 停止即消费会话，不可再写入
#[derive(Debug, Clone)]
pub struct RecordingSession {
    id: RecordingId,
    sample_rate: u32,
    channel_count: u16,
    max_frames: usize,
    state: RecordingState,
    buffer: Vec<f32>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl RecordingSession {
    /// 开始新的录音（创建即处于 Recording 状态）
    pub fn start(
        sample_rate: u32,
        channel_count: u16,
        max_frames: usize,
    ) -> Result<Self, RecordingError> {
        if sample_rate == 0 || channel_count == 0 {
            return Err(RecordingError::InvalidFormat {
                sample_rate,
                channels: channel_count,
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: RecordingId::new(),
            sample_rate,
            channel_count,
            max_frames,
            state: RecordingState::Recording,
            buffer: Vec::new(),
            created_at: now,
            last_activity: now,
        })
    }

    /// 写入 interleaved 帧，返回实际接收的帧数
    ///
    /// Paused 状态下的输入被丢弃（返回 0）
    pub fn append(&mut self, samples: &[f32]) -> Result<usize, RecordingError> {
        let channels = self.channel_count as usize;
        if samples.len() % channels != 0 {
            return Err(RecordingError::PartialFrame {
                samples: samples.len(),
                channels,
            });
        }
        self.last_activity = Utc::now();

        if self.state == RecordingState::Paused {
            return Ok(0);
        }

        let frames = samples.len() / channels;
        if self.frames() + frames > self.max_frames {
            return Err(RecordingError::CapacityExceeded {
                max_frames: self.max_frames,
            });
        }

        self.buffer.extend_from_slice(samples);
        Ok(frames)
    }

    pub fn pause(&mut self) -> Result<(), RecordingError> {
        if self.state != RecordingState::Recording {
            return Err(RecordingError::InvalidTransition {
                from: self.state,
                action: "pause",
            });
        }
        self.state = RecordingState::Paused;
        self.last_activity = Utc::now();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), RecordingError> {
        if self.state != RecordingState::Paused {
            return Err(RecordingError::InvalidTransition {
                from: self.state,
                action: "resume",
            });
        }
        self.state = RecordingState::Recording;
        self.last_activity = Utc::now();
        Ok(())
    }

    /// 停止录音并导出为采集采样率的 WAV
    pub fn export_wav(self) -> Result<EncodedAudioBlob, RecordingError> {
        if self.buffer.is_empty() {
            return Err(RecordingError::Empty);
        }
        let wav = encode_wav(self.sample_rate, self.channel_count, &self.buffer)?;
        Ok(EncodedAudioBlob::wav(wav).with_file_name(RECORDED_FILE_NAME))
    }

    // Getters
    pub fn id(&self) -> RecordingId {
        self.id
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn frames(&self) -> usize {
        self.buffer.len() / self.channel_count as usize
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{parse_wav_header, quantize};

    fn session() -> RecordingSession {
        RecordingSession::start(8000, 1, 100).unwrap()
    }

    #[test]
    fn test_rejects_invalid_format() {
        assert!(matches!(
            RecordingSession::start(0, 1, 10),
            Err(RecordingError::InvalidFormat { .. })
        ));
        assert!(matches!(
            RecordingSession::start(16000, 0, 10),
            Err(RecordingError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_pause_discards_frames() {
        let mut rec = session();
        assert_eq!(rec.append(&[0.1, 0.2]).unwrap(), 2);
        rec.pause().unwrap();
        assert_eq!(rec.append(&[0.3, 0.4]).unwrap(), 0);
        rec.resume().unwrap();
        assert_eq!(rec.append(&[0.5]).unwrap(), 1);

        let blob = rec.export_wav().unwrap();
        let pcm: Vec<i16> = blob.bytes()[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(pcm, vec![quantize(0.1), quantize(0.2), quantize(0.5)]);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut rec = session();
        assert!(matches!(
            rec.resume(),
            Err(RecordingError::InvalidTransition { action: "resume", .. })
        ));
        rec.pause().unwrap();
        assert!(matches!(
            rec.pause(),
            Err(RecordingError::InvalidTransition {
                from: RecordingState::Paused,
                ..
            })
        ));
    }

    #[test]
    fn test_capacity_and_partial_frames() {
        let mut rec = RecordingSession::start(8000, 2, 2).unwrap();
        assert!(matches!(
            rec.append(&[0.0; 3]),
            Err(RecordingError::PartialFrame { .. })
        ));
        assert_eq!(rec.append(&[0.0; 4]).unwrap(), 2);
        assert!(matches!(
            rec.append(&[0.0; 2]),
            Err(RecordingError::CapacityExceeded { max_frames: 2 })
        ));
        assert_eq!(rec.frames(), 2);
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        assert!(matches!(session().export_wav(), Err(RecordingError::Empty)));
    }

    #[test]
    fn test_export_wav_at_capture_rate() {
        let mut rec = RecordingSession::start(48000, 1, 48000).unwrap();
        rec.append(&vec![0.0; 4800]).unwrap();
        assert_eq!(rec.duration_ms(), 100);

        let blob = rec.export_wav().unwrap();
        assert_eq!(blob.file_name(), Some(RECORDED_FILE_NAME));
        let info = parse_wav_header(blob.bytes()).unwrap();
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.data_size, 9600);
    }
}
