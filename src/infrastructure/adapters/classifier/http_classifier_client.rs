//! HTTP Classifier Client - 调用外部分类服务
//!
//! 实现 ClassifierPort trait
//!
//! 外部分类 API:
//! POST http://localhost:8000/predict/
//! Request: multipart/form-data，每个文件一个 `files` 字段
//! Response: JSON 数组，每个文件一条结果，可能附带一条 `{"EER": "16.40%"}`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ClassifierError, ClassifierPort};
use crate::domain::audio::EncodedAudioBlob;
use crate::domain::prediction::{PredictionBatch, PredictionOutcome};

/// 上传字段名
const FILES_FIELD: &str = "files";

/// 响应数组中的一项
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireEntry {
    Success {
        filename: String,
        label: String,
        confidence: f64,
    },
    Failed {
        filename: String,
        error: String,
    },
    Summary {
        #[serde(rename = "EER")]
        eer: String,
    },
    Unknown(serde_json::Value),
}

/// 错误响应体（FastAPI 风格的 `detail` 或通用 `message`）
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn text(self) -> Option<String> {
        self.message.or_else(|| {
            self.detail.map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
        })
    }
}

/// HTTP 分类客户端配置
#[derive(Debug, Clone)]
pub struct HttpClassifierClientConfig {
    /// 分类服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpClassifierClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpClassifierClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 分类客户端
pub struct HttpClassifierClient {
    client: Client,
    config: HttpClassifierClientConfig,
}

impl HttpClassifierClient {
    pub fn new(config: HttpClassifierClientConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn predict_url(&self) -> String {
        format!("{}/predict/", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/docs", self.config.base_url.trim_end_matches('/'))
    }

    fn build_form(clips: &[EncodedAudioBlob]) -> Result<Form, ClassifierError> {
        let mut form = Form::new();
        for (index, clip) in clips.iter().enumerate() {
            let file_name = clip
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip-{}.wav", index));
            let part = Part::bytes(clip.bytes().to_vec())
                .file_name(file_name)
                .mime_str(clip.mime_type())
                .map_err(|e| ClassifierError::NetworkError(format!("Invalid MIME type: {}", e)))?;
            form = form.part(FILES_FIELD, part);
        }
        Ok(form)
    }
}

/// 把响应数组转换为 PredictionBatch
fn parse_entries(entries: Vec<WireEntry>) -> PredictionBatch {
    let mut batch = PredictionBatch::default();
    for entry in entries {
        match entry {
            WireEntry::Success {
                filename,
                label,
                confidence,
            } => batch.outcomes.push(PredictionOutcome::Success {
                filename,
                label,
                confidence,
            }),
            WireEntry::Failed { filename, error } => {
                batch.outcomes.push(PredictionOutcome::Failed { filename, error })
            }
            WireEntry::Summary { eer } => batch.eer = Some(eer),
            WireEntry::Unknown(value) => {
                tracing::warn!(entry = %value, "Ignoring unrecognized classifier entry");
            }
        }
    }
    batch
}

#[async_trait]
impl ClassifierPort for HttpClassifierClient {
    async fn classify(&self, clips: &[EncodedAudioBlob]) -> Result<PredictionBatch, ClassifierError> {
        let form = Self::build_form(clips)?;

        tracing::debug!(
            url = %self.predict_url(),
            clips = clips.len(),
            bytes = clips.iter().map(EncodedAudioBlob::len).sum::<usize>(),
            "Sending classification request"
        );

        let response = self
            .client
            .post(self.predict_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else if e.is_connect() {
                    ClassifierError::NetworkError(format!("Cannot connect to classifier service: {}", e))
                } else {
                    ClassifierError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::text)
                .unwrap_or(body);
            return Err(ClassifierError::ServiceError(format!("HTTP {}: {}", status, message)));
        }

        let entries: Vec<WireEntry> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout
            } else {
                ClassifierError::InvalidResponse(e.to_string())
            }
        })?;

        let batch = parse_entries(entries);

        tracing::info!(
            clips = clips.len(),
            results = batch.outcomes.len(),
            succeeded = batch.success_count(),
            eer = ?batch.eer,
            "Classification completed"
        );

        Ok(batch)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
