//! In-Memory Clip Store Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::application::ports::ClipStorePort;
use crate::domain::audio::EncodedAudioBlob;

struct StoredClip {
    clip: EncodedAudioBlob,
    created_at: DateTime<Utc>,
}

/// 内存音频暂存
pub struct InMemoryClipStore {
    clips: DashMap<Uuid, StoredClip>,
}

impl InMemoryClipStore {
    pub fn new() -> Self {
        Self {
            clips: DashMap::new(),
        }
    }
}

impl Default for InMemoryClipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipStorePort for InMemoryClipStore {
    fn put(&self, clip: EncodedAudioBlob) -> Uuid {
        let id = Uuid::new_v4();
        tracing::debug!(clip_id = %id, size = clip.len(), "Clip stored");
        self.clips.insert(
            id,
            StoredClip {
                clip,
                created_at: Utc::now(),
            },
        );
        id
    }

    fn get(&self, id: Uuid) -> Option<EncodedAudioBlob> {
        self.clips.get(&id).map(|entry| entry.clip.clone())
    }

    fn evict_older_than(&self, max_age_secs: u64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(max_age_secs as i64);
        let before = self.clips.len();
        self.clips.retain(|_, stored| stored.created_at >= cutoff);
        let evicted = before.saturating_sub(self.clips.len());
        if evicted > 0 {
            tracing::info!(evicted = evicted, "Evicted expired clips");
        }
        evicted
    }

    fn len(&self) -> usize {
        self.clips.len()
    }
}
