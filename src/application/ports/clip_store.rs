//! Clip Store Port - 已上传音频的临时存储（供下载）

use uuid::Uuid;

use crate::domain::audio::EncodedAudioBlob;

/// Clip Store Port
pub trait ClipStorePort: Send + Sync {
    /// 保存音频，返回下载 ID
    fn put(&self, clip: EncodedAudioBlob) -> Uuid;

    fn get(&self, id: Uuid) -> Option<EncodedAudioBlob>;

    /// 清理超过 max_age_secs 的音频，返回清理数量
    fn evict_older_than(&self, max_age_secs: u64) -> usize;

    fn len(&self) -> usize;
}
