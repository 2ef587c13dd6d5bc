//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AnalyzeAudioHandler, AnalyzeSettings, AppendFramesHandler, PauseRecordingHandler,
    ResampleAudioHandler, ResumeRecordingHandler, StartRecordingHandler, StopRecordingHandler,
    // Query handlers
    GetClipHandler, GetMetadataHandler, GetRecordingHandler,
    // Ports
    AudioCodecPort, AudioResampler, ClassifierPort, ClipStorePort, MetadataSourcePort,
    RecordingManagerPort,
};

/// 应用设置（来自配置文件）
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub analyze: AnalyzeSettings,
    /// 单个录音的最大帧数
    pub max_recording_frames: usize,
}

/// 应用状态
///
/// 录音会话和待下载音频为内存实现
pub struct AppState {
    // ========== Ports ==========
    pub classifier: Arc<dyn ClassifierPort>,
    pub recordings: Arc<dyn RecordingManagerPort>,
    pub clip_store: Arc<dyn ClipStorePort>,

    // ========== Command Handlers ==========
    pub analyze_handler: Arc<AnalyzeAudioHandler>,
    pub resample_handler: ResampleAudioHandler,
    pub start_recording_handler: StartRecordingHandler,
    pub append_frames_handler: AppendFramesHandler,
    pub pause_recording_handler: PauseRecordingHandler,
    pub resume_recording_handler: ResumeRecordingHandler,
    pub stop_recording_handler: StopRecordingHandler,

    // ========== Query Handlers ==========
    pub get_clip_handler: GetClipHandler,
    pub get_metadata_handler: GetMetadataHandler,
    pub get_recording_handler: GetRecordingHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        codec: Arc<dyn AudioCodecPort>,
        classifier: Arc<dyn ClassifierPort>,
        metadata_source: Arc<dyn MetadataSourcePort>,
        recordings: Arc<dyn RecordingManagerPort>,
        clip_store: Arc<dyn ClipStorePort>,
        settings: AppSettings,
    ) -> Self {
        let resampler = AudioResampler::new(codec);
        let analyze_handler = Arc::new(AnalyzeAudioHandler::new(
            resampler.clone(),
            classifier.clone(),
            metadata_source.clone(),
            clip_store.clone(),
            settings.analyze,
        ));

        Self {
            // Ports
            classifier,
            recordings: recordings.clone(),
            clip_store: clip_store.clone(),

            // Command handlers
            analyze_handler: analyze_handler.clone(),
            resample_handler: ResampleAudioHandler::new(
                resampler,
                settings.analyze.target_sample_rate,
            ),
            start_recording_handler: StartRecordingHandler::new(
                recordings.clone(),
                settings.max_recording_frames,
            ),
            append_frames_handler: AppendFramesHandler::new(recordings.clone()),
            pause_recording_handler: PauseRecordingHandler::new(recordings.clone()),
            resume_recording_handler: ResumeRecordingHandler::new(recordings.clone()),
            stop_recording_handler: StopRecordingHandler::new(
                recordings.clone(),
                clip_store.clone(),
                analyze_handler,
            ),

            // Query handlers
            get_clip_handler: GetClipHandler::new(clip_store),
            get_metadata_handler: GetMetadataHandler::new(metadata_source),
            get_recording_handler: GetRecordingHandler::new(recordings),
        }
    }
}
