//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                       GET   存活检查
//! - /api/health                     GET   分类服务可达性
//! - /api/analyze                    POST  上传音频并分析（multipart `files`）
//! - /api/resample                   POST  重采样为 16-bit PCM WAV（multipart `file`）
//! - /api/metadata                   GET   元数据表
//! - /api/audio/:clip_id             GET   下载已上传的音频
//! - /api/recording/start            POST  开始录音
//! - /api/recording/:id              GET   录音状态
//! - /api/recording/:id/frames       POST  写入采样（little-endian f32）
//! - /api/recording/:id/pause        POST  暂停
//! - /api/recording/:id/resume       POST  继续
//! - /api/recording/:id/stop         POST  停止并分析

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/resample", post(handlers::resample))
        .route("/metadata", get(handlers::list_metadata))
        .route("/audio/:clip_id", get(handlers::download_clip))
        .nest("/recording", recording_routes())
}

/// Recording 路由
fn recording_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_recording))
        .route("/:id", get(handlers::get_recording))
        .route("/:id/frames", post(handlers::append_frames))
        .route("/:id/pause", post(handlers::pause_recording))
        .route("/:id/resume", post(handlers::resume_recording))
        .route("/:id/stop", post(handlers::stop_recording))
}
