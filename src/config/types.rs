//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 分类服务配置
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// 元数据来源配置
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 录音配置
    #[serde(default)]
    pub recording: RecordingConfig,

    /// GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节），默认 50MB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 分类服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// 分类服务基础 URL（`/predict/` 由客户端拼接）
    #[serde(default = "default_classifier_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_classifier_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_classifier_timeout() -> u64 {
    120
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: default_classifier_url(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

/// 元数据来源类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSourceKind {
    #[default]
    File,
    Http,
}

/// 元数据配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub source: MetadataSourceKind,

    /// source = file 时读取的文件
    #[serde(default = "default_metadata_path")]
    pub path: PathBuf,

    /// source = http 时请求的地址
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP 请求超时时间（秒）
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("metadata.txt")
}

fn default_metadata_timeout() -> u64 {
    10
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            source: MetadataSourceKind::default(),
            path: default_metadata_path(),
            url: None,
            timeout_secs: default_metadata_timeout(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 上传前的目标采样率（Hz）
    #[serde(default = "default_target_sample_rate")]
    pub target_sample_rate: u32,

    /// 上传前是否重采样为 16-bit PCM WAV
    #[serde(default = "default_resample_before_upload")]
    pub resample_before_upload: bool,
}

fn default_target_sample_rate() -> u32 {
    16000
}

fn default_resample_before_upload() -> bool {
    true
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: default_target_sample_rate(),
            resample_before_upload: default_resample_before_upload(),
        }
    }
}

/// 录音配置
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// 单个录音的最大帧数，默认 48kHz 下 10 分钟
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

fn default_max_frames() -> usize {
    48000 * 600
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_frames: default_max_frames(),
        }
    }
}

/// GC（过期清理）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用自动 GC
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// GC 间隔时间（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 录音空闲超时（秒）
    #[serde(default = "default_recording_idle")]
    pub recording_idle_secs: u64,

    /// 已上传音频保留时间（秒）
    #[serde(default = "default_clip_expire")]
    pub clip_expire_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    60
}

fn default_recording_idle() -> u64 {
    600 // 10 分钟
}

fn default_clip_expire() -> u64 {
    3600 // 1 小时
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            recording_idle_secs: default_recording_idle(),
            clip_expire_secs: default_clip_expire(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.classifier.url, "http://127.0.0.1:8000");
        assert_eq!(config.metadata.source, MetadataSourceKind::File);
        assert_eq!(config.audio.target_sample_rate, 16000);
        assert!(config.audio.resample_before_upload);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8081");
    }
}
