//! SpoofScan - 语音伪造检测客户端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Audio: 解码后的 PCM、WAV 编码、重采样长度计算
//! - Metadata: 数据集元数据表（name;extension;compression）
//! - Prediction: 分类结果与 EER
//! - Recording: 麦克风录音会话状态机
//!
//! 应用层 (application/):
//! - Ports: AudioCodec, Classifier, MetadataSource, RecordingManager, ClipStore
//! - Resampler: decode → resample → WAV 16-bit PCM
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: RecordingManager, ClipStore 内存实现
//! - Worker: ExpirySweeper 过期清理
//! - Adapters: Symphonia 编解码、分类服务客户端、元数据来源

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
