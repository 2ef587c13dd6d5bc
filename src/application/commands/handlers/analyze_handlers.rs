//! Analyze Command Handlers

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::application::commands::{AnalyzeAudio, ResampleAudio};
use crate::application::error::ApplicationError;
use crate::application::ports::{ClassifierPort, ClipStorePort, MetadataSourcePort};
use crate::application::resampler::{AudioResampler, ResampleRequest, DEFAULT_TARGET_RATE};
use crate::domain::audio::{parse_wav_header, EncodedAudioBlob};
use crate::domain::metadata::{MetadataRow, MetadataTable};
use crate::domain::prediction::PredictionOutcome;

/// 上传前处理设置
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeSettings {
    pub target_sample_rate: u32,
    /// 上传前是否统一重采样为 16-bit PCM WAV
    pub resample_before_upload: bool,
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            target_sample_rate: DEFAULT_TARGET_RATE,
            resample_before_upload: true,
        }
    }
}

// ============================================================================
// AnalyzeAudio
// ============================================================================

/// 已上传音频的描述
#[derive(Debug, Clone, Serialize)]
pub struct ClipInfo {
    pub clip_id: Uuid,
    /// 上传给分类服务的文件名
    pub file_name: String,
    /// 下载时使用的文件名
    pub download_name: String,
    pub mime_type: String,
    pub size: usize,
    /// 以下字段仅在上传内容为 WAV 时可用
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub duration_ms: Option<u64>,
}

/// 单个文件的分析结果，按序号关联到上传的音频
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub outcome: PredictionOutcome,
    pub clip_id: Option<Uuid>,
}

/// 分析报告
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: Vec<MetadataRow>,
    pub results: Vec<AnalysisResult>,
    pub eer: Option<String>,
    pub clips: Vec<ClipInfo>,
}

/// AnalyzeAudio Handler
pub struct AnalyzeAudioHandler {
    resampler: AudioResampler,
    classifier: Arc<dyn ClassifierPort>,
    metadata_source: Arc<dyn MetadataSourcePort>,
    clip_store: Arc<dyn ClipStorePort>,
    settings: AnalyzeSettings,
}

impl AnalyzeAudioHandler {
    pub fn new(
        resampler: AudioResampler,
        classifier: Arc<dyn ClassifierPort>,
        metadata_source: Arc<dyn MetadataSourcePort>,
        clip_store: Arc<dyn ClipStorePort>,
        settings: AnalyzeSettings,
    ) -> Self {
        Self {
            resampler,
            classifier,
            metadata_source,
            clip_store,
            settings,
        }
    }

    pub async fn handle(&self, command: AnalyzeAudio) -> Result<AnalysisReport, ApplicationError> {
        if command.clips.is_empty() {
            return Err(ApplicationError::validation("Please select or record files first"));
        }

        let clips: Vec<EncodedAudioBlob> = command
            .clips
            .into_iter()
            .enumerate()
            .map(|(index, clip)| {
                let named = clip.file_name().is_some_and(|n| !n.trim().is_empty());
                if named {
                    clip
                } else {
                    clip.with_file_name(format!("clip-{}", index))
                }
            })
            .collect();

        let table = self.load_metadata().await;
        let metadata = clips
            .iter()
            .map(|clip| table.row_for(clip.file_name().unwrap_or_default()))
            .collect();

        let uploads = self.prepare_uploads(clips).await?;

        let clip_infos: Vec<ClipInfo> = uploads
            .iter()
            .enumerate()
            .map(|(index, upload)| self.store_clip(index, upload))
            .collect();

        let batch = self.classifier.classify(&uploads).await?;

        if batch.outcomes.len() != uploads.len() {
            tracing::warn!(
                uploaded = uploads.len(),
                results = batch.outcomes.len(),
                "Classifier returned a different number of results"
            );
        }

        let results = batch
            .outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| AnalysisResult {
                outcome,
                clip_id: clip_infos.get(index).map(|c| c.clip_id),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            clips = clip_infos.len(),
            results = results.len(),
            eer = ?batch.eer,
            "Analysis completed"
        );

        Ok(AnalysisReport {
            metadata,
            results,
            eer: batch.eer,
            clips: clip_infos,
        })
    }

    /// 元数据获取失败不影响分析，按空表处理
    async fn load_metadata(&self) -> MetadataTable {
        match self.metadata_source.fetch().await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    source = %self.metadata_source.describe(),
                    error = %e,
                    "Failed to load metadata, continuing without it"
                );
                MetadataTable::default()
            }
        }
    }

    async fn prepare_uploads(
        &self,
        clips: Vec<EncodedAudioBlob>,
    ) -> Result<Vec<EncodedAudioBlob>, ApplicationError> {
        if !self.settings.resample_before_upload {
            return Ok(clips);
        }

        let mut uploads = Vec::with_capacity(clips.len());
        for clip in clips {
            let name = clip.file_name().unwrap_or_default().to_string();
            let request = ResampleRequest::new(clip).with_target_rate(self.settings.target_sample_rate);
            let upload = self.resampler.resample(request).await.map_err(|e| {
                tracing::warn!(file = %name, error = %e, "Failed to resample clip");
                ApplicationError::validation(format!("{}: {}", name, e))
            })?;
            uploads.push(upload);
        }
        Ok(uploads)
    }

    fn store_clip(&self, index: usize, upload: &EncodedAudioBlob) -> ClipInfo {
        let extension = upload.extension().unwrap_or_else(|| "wav".to_string());
        let download_name = format!("uploaded-audio-{}.{}", index, extension);
        let header = parse_wav_header(upload.bytes()).ok();

        let clip_id = self
            .clip_store
            .put(upload.clone().with_file_name(download_name.clone()));

        ClipInfo {
            clip_id,
            file_name: upload.file_name().unwrap_or_default().to_string(),
            download_name,
            mime_type: upload.mime_type().to_string(),
            size: upload.len(),
            sample_rate: header.as_ref().map(|h| h.sample_rate),
            channels: header.as_ref().map(|h| h.channels),
            duration_ms: header.as_ref().map(|h| h.duration_ms),
        }
    }
}

// ============================================================================
// ResampleAudio
// ============================================================================

/// ResampleAudio Handler
pub struct ResampleAudioHandler {
    resampler: AudioResampler,
    default_target_rate: u32,
}

impl ResampleAudioHandler {
    pub fn new(resampler: AudioResampler, default_target_rate: u32) -> Self {
        Self {
            resampler,
            default_target_rate,
        }
    }

    pub async fn handle(&self, command: ResampleAudio) -> Result<EncodedAudioBlob, ApplicationError> {
        let target_rate = command.target_rate.unwrap_or(self.default_target_rate);
        let input_size = command.clip.len();

        let output = self
            .resampler
            .resample(ResampleRequest::new(command.clip).with_target_rate(target_rate))
            .await?;

        tracing::info!(
            input_size = input_size,
            output_size = output.len(),
            target_rate = target_rate,
            "Audio resampled"
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MetadataError;
    use crate::domain::audio::{encode_sample, AudioSample, WAV_MIME};
    use crate::infrastructure::adapters::{
        FakeClassifierClient, FakeClassifierClientConfig, SymphoniaCodec,
    };
    use crate::infrastructure::memory::InMemoryClipStore;
    use async_trait::async_trait;

    struct StaticMetadata(Option<&'static str>);

    #[async_trait]
    impl MetadataSourcePort for StaticMetadata {
        async fn fetch(&self) -> Result<MetadataTable, MetadataError> {
            match self.0 {
                Some(text) => Ok(MetadataTable::parse(text)),
                None => Err(MetadataError::FetchError("unreachable".to_string())),
            }
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct Fixture {
        handler: AnalyzeAudioHandler,
        classifier: Arc<FakeClassifierClient>,
        clip_store: Arc<InMemoryClipStore>,
    }

    fn fixture(metadata: Option<&'static str>, settings: AnalyzeSettings) -> Fixture {
        let classifier = Arc::new(FakeClassifierClient::new(FakeClassifierClientConfig {
            label: "Spoof".to_string(),
            confidence: 0.9,
            eer: Some("12.50%".to_string()),
            fail_with: None,
        }));
        let clip_store = Arc::new(InMemoryClipStore::new());
        let handler = AnalyzeAudioHandler::new(
            AudioResampler::new(Arc::new(SymphoniaCodec::new())),
            classifier.clone(),
            Arc::new(StaticMetadata(metadata)),
            clip_store.clone(),
            settings,
        );
        Fixture {
            handler,
            classifier,
            clip_store,
        }
    }

    fn wav_clip(name: &str, sample_rate: u32, frames: usize) -> EncodedAudioBlob {
        let sample = AudioSample::mono(sample_rate, vec![0.25; frames]).unwrap();
        EncodedAudioBlob::wav(encode_sample(&sample).unwrap()).with_file_name(name)
    }

    #[tokio::test]
    async fn test_rejects_empty_batch() {
        let f = fixture(None, AnalyzeSettings::default());
        let err = f.handler.handle(AnalyzeAudio { clips: vec![] }).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(f.classifier.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_resamples_and_reports() {
        let f = fixture(
            Some("name;extension;compression\nT_01.wav;wav;none\n"),
            AnalyzeSettings::default(),
        );
        let report = f
            .handler
            .handle(AnalyzeAudio {
                clips: vec![wav_clip("t_01.WAV", 44100, 4410), wav_clip("other.wav", 8000, 800)],
            })
            .await
            .unwrap();

        // 元数据行保留原文件名，缺失字段为 N/A
        assert_eq!(report.metadata.len(), 2);
        assert_eq!(report.metadata[0].file_name, "t_01.WAV");
        assert_eq!(report.metadata[0].compression, "none");
        assert_eq!(report.metadata[1].extension, "N/A");

        // 上传的音频均为 16 kHz 单声道 WAV
        let uploads = f.classifier.uploads();
        assert_eq!(uploads.len(), 1);
        for upload in &uploads[0] {
            let info = parse_wav_header(upload.bytes()).unwrap();
            assert_eq!(info.sample_rate, 16000);
            assert_eq!(upload.mime_type(), WAV_MIME);
        }
        assert_eq!(uploads[0][0].file_name(), Some("t_01.wav"));

        assert_eq!(report.clips[0].sample_rate, Some(16000));
        assert_eq!(report.clips[0].duration_ms, Some(100));
        assert_eq!(report.clips[1].download_name, "uploaded-audio-1.wav");

        // 结果按序号关联到已存储的音频
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.eer.as_deref(), Some("12.50%"));
        let clip_id = report.results[1].clip_id.unwrap();
        assert_eq!(clip_id, report.clips[1].clip_id);
        let stored = f.clip_store.get(clip_id).unwrap();
        assert_eq!(stored.file_name(), Some("uploaded-audio-1.wav"));
        assert_eq!(f.clip_store.len(), 2);
    }

    #[tokio::test]
    async fn test_metadata_failure_is_not_fatal() {
        let f = fixture(None, AnalyzeSettings::default());
        let report = f
            .handler
            .handle(AnalyzeAudio {
                clips: vec![wav_clip("a.wav", 16000, 160)],
            })
            .await
            .unwrap();
        assert_eq!(report.metadata[0].extension, "N/A");
        assert_eq!(report.results.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_clip_fails_whole_request() {
        let f = fixture(None, AnalyzeSettings::default());
        let garbage = EncodedAudioBlob::new(vec![7u8; 64], "audio/ogg").with_file_name("bad.ogg");
        let err = f
            .handler
            .handle(AnalyzeAudio {
                clips: vec![wav_clip("a.wav", 16000, 160), garbage],
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("bad.ogg"));
        assert!(f.classifier.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_passthrough_when_resampling_disabled() {
        let f = fixture(
            None,
            AnalyzeSettings {
                resample_before_upload: false,
                ..AnalyzeSettings::default()
            },
        );
        let clip = EncodedAudioBlob::new(vec![1u8, 2, 3], "audio/flac");
        let report = f.handler.handle(AnalyzeAudio { clips: vec![clip] }).await.unwrap();

        let uploads = f.classifier.uploads();
        assert_eq!(uploads[0][0].bytes(), &[1, 2, 3]);
        assert_eq!(uploads[0][0].file_name(), Some("clip-0"));
        assert_eq!(report.clips[0].sample_rate, None);
        assert_eq!(report.clips[0].download_name, "uploaded-audio-0.wav");
    }

    #[tokio::test]
    async fn test_classifier_failure_maps_to_external_error() {
        let classifier = Arc::new(FakeClassifierClient::new(FakeClassifierClientConfig {
            fail_with: Some("HTTP 500".to_string()),
            ..FakeClassifierClientConfig::default()
        }));
        let handler = AnalyzeAudioHandler::new(
            AudioResampler::new(Arc::new(SymphoniaCodec::new())),
            classifier,
            Arc::new(StaticMetadata(None)),
            Arc::new(InMemoryClipStore::new()),
            AnalyzeSettings::default(),
        );
        let err = handler
            .handle(AnalyzeAudio {
                clips: vec![wav_clip("a.wav", 16000, 16)],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_resample_handler_uses_default_rate() {
        let handler =
            ResampleAudioHandler::new(AudioResampler::new(Arc::new(SymphoniaCodec::new())), 8000);
        let output = handler
            .handle(ResampleAudio {
                clip: wav_clip("voice.wav", 16000, 1600),
                target_rate: None,
            })
            .await
            .unwrap();
        let info = parse_wav_header(output.bytes()).unwrap();
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.data_size, 800 * 2);

        let err = handler
            .handle(ResampleAudio {
                clip: EncodedAudioBlob::wav(Vec::new()),
                target_rate: Some(16000),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
