//! SpoofScan - 语音伪造检测客户端服务
//!
//! - Domain: audio/, metadata/, prediction/, recording/
//! - Application: commands, queries, ports, resampler
//! - Infrastructure: http, memory, worker, adapters

use std::sync::Arc;

use spoofscan::application::{AnalyzeSettings, MetadataSourcePort};
use spoofscan::config::{load_config, print_config, MetadataSourceKind};
use spoofscan::infrastructure::adapters::{
    FileMetadataSource, HttpClassifierClient, HttpClassifierClientConfig, HttpMetadataSource,
    SymphoniaCodec,
};
use spoofscan::infrastructure::http::{AppSettings, AppState, HttpServer, ServerConfig};
use spoofscan::infrastructure::memory::{InMemoryClipStore, InMemoryRecordingManager};
use spoofscan::infrastructure::worker::{ExpirySweeper, SweeperConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},spoofscan={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("SpoofScan - spoof/genuine audio analysis");
    print_config(&config);

    // 音频编解码
    let codec = Arc::new(SymphoniaCodec::new());

    // 分类服务客户端
    let classifier_config = HttpClassifierClientConfig::new(config.classifier.url.clone())
        .with_timeout(config.classifier.timeout_secs);
    let classifier = Arc::new(HttpClassifierClient::new(classifier_config)?);

    // 元数据来源
    let metadata_source: Arc<dyn MetadataSourcePort> = match config.metadata.source {
        MetadataSourceKind::File => Arc::new(FileMetadataSource::new(&config.metadata.path)),
        MetadataSourceKind::Http => {
            let url = config.metadata.url.clone().unwrap_or_default();
            Arc::new(HttpMetadataSource::new(url, config.metadata.timeout_secs)?)
        }
    };

    // 内存状态
    let recordings = Arc::new(InMemoryRecordingManager::new());
    let clip_store = Arc::new(InMemoryClipStore::new());

    // 启动过期清理 Worker
    if config.gc.enabled {
        let sweeper = ExpirySweeper::new(
            SweeperConfig {
                interval_secs: config.gc.interval_secs,
                recording_idle_secs: config.gc.recording_idle_secs,
                clip_expire_secs: config.gc.clip_expire_secs,
            },
            recordings.clone(),
            clip_store.clone(),
        );
        tokio::spawn(sweeper.run());
    }

    // 创建 HTTP 服务器
    let settings = AppSettings {
        analyze: AnalyzeSettings {
            target_sample_rate: config.audio.target_sample_rate,
            resample_before_upload: config.audio.resample_before_upload,
        },
        max_recording_frames: config.recording.max_frames,
    };
    let state = AppState::new(
        codec,
        classifier,
        metadata_source,
        recordings,
        clip_store,
        settings,
    );

    let mut server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            config.server.static_files.path.clone(),
            config.server.static_files.dir.clone(),
        );
    }

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
