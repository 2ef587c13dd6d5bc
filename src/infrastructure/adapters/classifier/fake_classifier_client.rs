//! Fake Classifier Client - 用于测试的分类客户端
//!
//! 不访问网络，记录收到的上传，对每个文件返回固定结果

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{ClassifierError, ClassifierPort};
use crate::domain::audio::EncodedAudioBlob;
use crate::domain::prediction::{PredictionBatch, PredictionOutcome};

/// Fake Classifier 配置
#[derive(Debug, Clone)]
pub struct FakeClassifierClientConfig {
    /// 固定返回的标签
    pub label: String,
    pub confidence: f64,
    /// 附带的 EER，None 表示不返回
    pub eer: Option<String>,
    /// 非空时所有请求都以 ServiceError 失败
    pub fail_with: Option<String>,
}

impl Default for FakeClassifierClientConfig {
    fn default() -> Self {
        Self {
            label: "Genuine".to_string(),
            confidence: 0.5,
            eer: None,
            fail_with: None,
        }
    }
}

pub struct FakeClassifierClient {
    config: FakeClassifierClientConfig,
    uploads: Mutex<Vec<Vec<EncodedAudioBlob>>>,
}

impl FakeClassifierClient {
    pub fn new(config: FakeClassifierClientConfig) -> Self {
        Self {
            config,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeClassifierClientConfig::default())
    }

    /// 目前为止收到的所有批次
    pub fn uploads(&self) -> Vec<Vec<EncodedAudioBlob>> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ClassifierPort for FakeClassifierClient {
    async fn classify(&self, clips: &[EncodedAudioBlob]) -> Result<PredictionBatch, ClassifierError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(clips.to_vec());
        }

        if let Some(message) = &self.config.fail_with {
            return Err(ClassifierError::ServiceError(message.clone()));
        }

        tracing::debug!(clips = clips.len(), "FakeClassifierClient: returning fixed results");

        let outcomes = clips
            .iter()
            .enumerate()
            .map(|(index, clip)| PredictionOutcome::Success {
                filename: clip
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("clip-{}.wav", index)),
                label: self.config.label.clone(),
                confidence: self.config.confidence,
            })
            .collect();

        Ok(PredictionBatch {
            outcomes,
            eer: self.config.eer.clone(),
        })
    }
}
