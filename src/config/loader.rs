//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, MetadataSourceKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SPOOFSCAN_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SPOOFSCAN_SERVER__PORT=8081`
/// - `SPOOFSCAN_CLASSIFIER__URL=http://classifier:8000`
/// - `SPOOFSCAN_METADATA__SOURCE=http`
/// - `SPOOFSCAN_AUDIO__TARGET_SAMPLE_RATE=16000`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8081)?
        .set_default("server.max_body_bytes", 50 * 1024 * 1024)?
        .set_default("classifier.url", "http://127.0.0.1:8000")?
        .set_default("classifier.timeout_secs", 120)?
        .set_default("metadata.source", "file")?
        .set_default("metadata.path", "metadata.txt")?
        .set_default("metadata.timeout_secs", 10)?
        .set_default("audio.target_sample_rate", 16000)?
        .set_default("audio.resample_before_upload", true)?
        .set_default("recording.max_frames", 48000 * 600)?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 60)?
        .set_default("gc.recording_idle_secs", 600)?
        .set_default("gc.clip_expire_secs", 3600)?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: SPOOFSCAN_CLASSIFIER__URL=http://classifier:8000
    builder = builder.add_source(
        Environment::with_prefix("SPOOFSCAN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.classifier.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Classifier URL cannot be empty".to_string(),
        ));
    }

    if config.audio.target_sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Target sample rate must be positive".to_string(),
        ));
    }

    if config.metadata.source == MetadataSourceKind::Http
        && config
            .metadata
            .url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "metadata.url is required when metadata.source = http".to_string(),
        ));
    }

    if config.recording.max_frames == 0 {
        return Err(ConfigError::ValidationError(
            "Recording max_frames cannot be 0".to_string(),
        ));
    }

    if config.gc.enabled && config.gc.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!("Classifier URL: {}", config.classifier.url);
    tracing::info!("Classifier Timeout: {}s", config.classifier.timeout_secs);
    match config.metadata.source {
        MetadataSourceKind::File => {
            tracing::info!("Metadata: file {:?}", config.metadata.path)
        }
        MetadataSourceKind::Http => tracing::info!(
            "Metadata: http {}",
            config.metadata.url.as_deref().unwrap_or_default()
        ),
    }
    tracing::info!(
        "Resample Before Upload: {} ({} Hz)",
        config.audio.resample_before_upload,
        config.audio.target_sample_rate
    );
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Recording Idle Expire: {}s", config.gc.recording_idle_secs);
        tracing::info!("Clip Expire: {}s", config.gc.clip_expire_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_classifier_url() {
        let mut config = AppConfig::default();
        config.classifier.url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_target_rate() {
        let mut config = AppConfig::default();
        config.audio.target_sample_rate = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_http_metadata_requires_url() {
        let mut config = AppConfig::default();
        config.metadata.source = MetadataSourceKind::Http;
        assert!(validate_config(&config).is_err());

        config.metadata.url = Some("http://meta.local/metadata.txt".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_gc_interval_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.gc.interval_secs = 0;
        assert!(validate_config(&config).is_err());

        config.gc.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let file = write_config(
            r#"
[server]
port = 9090

[classifier]
url = "http://classifier:8000"

[metadata]
source = "http"
url = "http://meta.local/metadata.txt"

[audio]
resample_before_upload = false
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.classifier.url, "http://classifier:8000");
        assert_eq!(config.classifier.timeout_secs, 120);
        assert_eq!(config.metadata.source, MetadataSourceKind::Http);
        assert_eq!(
            config.metadata.url.as_deref(),
            Some("http://meta.local/metadata.txt")
        );
        assert!(!config.audio.resample_before_upload);
        assert_eq!(config.audio.target_sample_rate, 16000);
        assert_eq!(config.gc.clip_expire_secs, 3600);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let file = write_config(
            r#"
[metadata]
source = "http"
"#,
        );

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
