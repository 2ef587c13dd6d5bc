//! Expiry Sweeper - 定期清理空闲录音与过期音频

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ClipStorePort, RecordingManagerPort};

/// Sweeper 配置
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// 扫描间隔（秒）
    pub interval_secs: u64,
    /// 录音空闲超时（秒）
    pub recording_idle_secs: u64,
    /// 已上传音频保留时间（秒）
    pub clip_expire_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            recording_idle_secs: 600,
            clip_expire_secs: 3600,
        }
    }
}

/// 单次扫描结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepResult {
    pub recordings_discarded: usize,
    pub clips_evicted: usize,
}

/// 过期清理 Worker
pub struct ExpirySweeper {
    config: SweeperConfig,
    recordings: Arc<dyn RecordingManagerPort>,
    clip_store: Arc<dyn ClipStorePort>,
}

impl ExpirySweeper {
    pub fn new(
        config: SweeperConfig,
        recordings: Arc<dyn RecordingManagerPort>,
        clip_store: Arc<dyn ClipStorePort>,
    ) -> Self {
        Self {
            config,
            recordings,
            clip_store,
        }
    }

    /// 执行一次清理
    pub fn sweep(&self) -> SweepResult {
        let expired = self.recordings.get_expired(self.config.recording_idle_secs);
        let recordings_discarded = expired
            .into_iter()
            .filter(|id| self.recordings.discard(*id))
            .count();

        let clips_evicted = self.clip_store.evict_older_than(self.config.clip_expire_secs);

        SweepResult {
            recordings_discarded,
            clips_evicted,
        }
    }

    /// 启动 Worker（永不返回）
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            recording_idle_secs = self.config.recording_idle_secs,
            clip_expire_secs = self.config.clip_expire_secs,
            "ExpirySweeper started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let result = self.sweep();
            if result != SweepResult::default() {
                tracing::info!(
                    recordings = result.recordings_discarded,
                    clips = result.clips_evicted,
                    "Expired items removed"
                );
            }
        }
    }
}
