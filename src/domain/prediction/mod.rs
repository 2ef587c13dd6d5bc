//! Prediction Context - 分类结果
//!
//! 远程分类服务对每个上传文件返回一条结果（按上传顺序），
//! 并可能附带整个批次的 EER 统计。

use serde::Serialize;

/// 单个文件的分类结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionOutcome {
    Success {
        filename: String,
        label: String,
        confidence: f64,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl PredictionOutcome {
    pub fn filename(&self) -> &str {
        match self {
            Self::Success { filename, .. } | Self::Failed { filename, .. } => filename,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 一次批量上传的结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionBatch {
    pub outcomes: Vec<PredictionOutcome>,
    /// 服务端计算的 EER，例如 `"16.40%"`
    pub eer: Option<String>,
}

impl PredictionBatch {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_with_status() {
        let ok = PredictionOutcome::Success {
            filename: "a.wav".to_string(),
            label: "Genuine".to_string(),
            confidence: 0.25,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["label"], "Genuine");

        let failed = PredictionOutcome::Failed {
            filename: "b.mp3".to_string(),
            error: "Invalid file format".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(failed.filename(), "b.mp3");
    }

    #[test]
    fn test_success_count() {
        let batch = PredictionBatch {
            outcomes: vec![
                PredictionOutcome::Success {
                    filename: "a.wav".to_string(),
                    label: "Spoof".to_string(),
                    confidence: 0.9,
                },
                PredictionOutcome::Failed {
                    filename: "b.wav".to_string(),
                    error: "boom".to_string(),
                },
            ],
            eer: None,
        };
        assert_eq!(batch.success_count(), 1);
    }
}
