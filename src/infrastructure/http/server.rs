//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 静态网页配置
#[derive(Debug, Clone)]
pub struct StaticFiles {
    /// 挂载路径，例如 `/`
    pub mount_path: String,
    pub dir: PathBuf,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体大小上限（用于文件上传）
    pub max_body_bytes: usize,
    pub static_files: Option<StaticFiles>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            max_body_bytes: 50 * 1024 * 1024,
            static_files: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn with_static_files(mut self, mount_path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.static_files = Some(StaticFiles {
            mount_path: mount_path.into(),
            dir: dir.into(),
        });
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        let mut router = create_routes();

        if let Some(static_files) = &self.config.static_files {
            let serve_dir = ServeDir::new(&static_files.dir);
            router = if static_files.mount_path == "/" {
                router.fallback_service(serve_dir)
            } else {
                router.nest_service(&static_files.mount_path, serve_dir)
            };
        }

        router
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AnalyzeSettings, MetadataError, MetadataSourcePort};
    use crate::domain::metadata::MetadataTable;
    use crate::infrastructure::adapters::{FakeClassifierClient, SymphoniaCodec};
    use crate::infrastructure::http::state::AppSettings;
    use crate::infrastructure::memory::{InMemoryClipStore, InMemoryRecordingManager};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    struct EmptyMetadata;

    #[async_trait]
    impl MetadataSourcePort for EmptyMetadata {
        async fn fetch(&self) -> Result<MetadataTable, MetadataError> {
            Ok(MetadataTable::default())
        }

        fn describe(&self) -> String {
            "empty".to_string()
        }
    }

    fn server(config: ServerConfig) -> HttpServer {
        let state = AppState::new(
            Arc::new(SymphoniaCodec::new()),
            Arc::new(FakeClassifierClient::with_defaults()),
            Arc::new(EmptyMetadata),
            Arc::new(InMemoryRecordingManager::new()),
            Arc::new(InMemoryClipStore::new()),
            AppSettings {
                analyze: AnalyzeSettings::default(),
                max_recording_frames: 1000,
            },
        );
        HttpServer::new(config, state)
    }

    #[test]
    fn test_config_addr() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.max_body_bytes, 50 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_serves_static_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>spoofscan</h1>").unwrap();

        let router = server(ServerConfig::default().with_static_files("/", dir.path())).router();

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>spoofscan</h1>");

        // API 路由优先于静态文件 fallback
        let response = router
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let router = server(ServerConfig::default().with_max_body_bytes(16)).router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recording/start")
                    .header("content-type", "application/json")
                    .body(Body::from(format!("{{\"sample_rate\": 16000, \"pad\": \"{}\"}}", "x".repeat(64))))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
