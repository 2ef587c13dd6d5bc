//! Audio Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ClipStorePort, RecordingManagerPort, RecordingStatus};
use crate::application::queries::{GetClip, GetRecording};
use crate::domain::audio::EncodedAudioBlob;

/// GetClip Handler - 获取音频数据
pub struct GetClipHandler {
    clip_store: Arc<dyn ClipStorePort>,
}

impl GetClipHandler {
    pub fn new(clip_store: Arc<dyn ClipStorePort>) -> Self {
        Self { clip_store }
    }

    pub async fn handle(&self, query: GetClip) -> Result<EncodedAudioBlob, ApplicationError> {
        self.clip_store
            .get(query.clip_id)
            .ok_or_else(|| ApplicationError::not_found("Clip", query.clip_id))
    }
}

/// GetRecording Handler - 获取录音状态
pub struct GetRecordingHandler {
    recordings: Arc<dyn RecordingManagerPort>,
}

impl GetRecordingHandler {
    pub fn new(recordings: Arc<dyn RecordingManagerPort>) -> Self {
        Self { recordings }
    }

    pub async fn handle(&self, query: GetRecording) -> Result<RecordingStatus, ApplicationError> {
        Ok(self.recordings.status(query.recording_id)?)
    }
}
