//! In-Memory Recording Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{RecordingManagerPort, RecordingStatus};
use crate::domain::recording::{RecordingError, RecordingId, RecordingSession};

/// 内存录音会话管理器
pub struct InMemoryRecordingManager {
    sessions: DashMap<RecordingId, RecordingSession>,
}

impl InMemoryRecordingManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn with_session<T>(
        &self,
        id: RecordingId,
        f: impl FnOnce(&mut RecordingSession) -> Result<T, RecordingError>,
    ) -> Result<T, RecordingError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| RecordingError::NotFound(id.to_string()))?;
        f(session.value_mut())
    }
}

impl Default for InMemoryRecordingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingManagerPort for InMemoryRecordingManager {
    fn insert(&self, session: RecordingSession) -> Result<RecordingId, RecordingError> {
        let id = session.id();
        tracing::info!(
            recording_id = %id,
            sample_rate = session.sample_rate(),
            channels = session.channel_count(),
            "Recording started"
        );
        self.sessions.insert(id, session);
        Ok(id)
    }

    fn status(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError> {
        self.sessions
            .get(&id)
            .map(|s| RecordingStatus::from(&*s))
            .ok_or_else(|| RecordingError::NotFound(id.to_string()))
    }

    fn append(&self, id: RecordingId, samples: &[f32]) -> Result<usize, RecordingError> {
        self.with_session(id, |session| session.append(samples))
    }

    fn pause(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError> {
        self.with_session(id, |session| {
            session.pause()?;
            tracing::debug!(recording_id = %id, frames = session.frames(), "Recording paused");
            Ok(RecordingStatus::from(&*session))
        })
    }

    fn resume(&self, id: RecordingId) -> Result<RecordingStatus, RecordingError> {
        self.with_session(id, |session| {
            session.resume()?;
            tracing::debug!(recording_id = %id, "Recording resumed");
            Ok(RecordingStatus::from(&*session))
        })
    }

    fn take(&self, id: RecordingId) -> Result<RecordingSession, RecordingError> {
        self.sessions
            .remove(&id)
            .map(|(_, session)| {
                tracing::info!(recording_id = %id, frames = session.frames(), "Recording stopped");
                session
            })
            .ok_or_else(|| RecordingError::NotFound(id.to_string()))
    }

    fn get_expired(&self, idle_timeout_secs: u64) -> Vec<RecordingId> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity();
                if elapsed > timeout {
                    Some(*entry.key())
                } else {
                    None
                }
            })
            .collect()
    }

    fn discard(&self, id: RecordingId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            tracing::info!(recording_id = %id, "Recording discarded");
        }
        removed
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::RecordingState;

    #[test]
    fn test_recording_lifecycle() {
        let manager = InMemoryRecordingManager::new();
        let id = manager
            .insert(RecordingSession::start(8000, 2, 1000).unwrap())
            .unwrap();

        // Append
        assert_eq!(manager.append(id, &[0.1, -0.1, 0.2, -0.2]).unwrap(), 2);
        let status = manager.status(id).unwrap();
        assert_eq!(status.frames, 2);
        assert_eq!(status.channels, 2);
        assert_eq!(status.state, RecordingState::Recording);

        // Pause / resume
        assert_eq!(manager.pause(id).unwrap().state, RecordingState::Paused);
        assert_eq!(manager.append(id, &[0.5, 0.5]).unwrap(), 0);
        assert_eq!(manager.resume(id).unwrap().state, RecordingState::Recording);

        // Take
        let session = manager.take(id).unwrap();
        assert_eq!(session.frames(), 2);
        assert_eq!(manager.len(), 0);
        assert!(matches!(manager.status(id), Err(RecordingError::NotFound(_))));
    }

    #[test]
    fn test_unknown_id() {
        let manager = InMemoryRecordingManager::new();
        let id = RecordingId::new();
        assert!(matches!(manager.append(id, &[0.0]), Err(RecordingError::NotFound(_))));
        assert!(matches!(manager.take(id), Err(RecordingError::NotFound(_))));
        assert!(!manager.discard(id));
    }

    #[test]
    fn test_append_error_keeps_session() {
        let manager = InMemoryRecordingManager::new();
        let id = manager
            .insert(RecordingSession::start(8000, 2, 1000).unwrap())
            .unwrap();
        assert!(matches!(
            manager.append(id, &[0.1, 0.2, 0.3]),
            Err(RecordingError::PartialFrame { .. })
        ));
        assert_eq!(manager.status(id).unwrap().frames, 0);
    }

    #[test]
    fn test_expired_sessions() {
        let manager = InMemoryRecordingManager::new();
        let id = manager
            .insert(RecordingSession::start(8000, 1, 10).unwrap())
            .unwrap();

        assert!(manager.get_expired(60).is_empty());

        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(manager.get_expired(0), vec![id]);

        assert!(manager.discard(id));
        assert_eq!(manager.len(), 0);
    }
}
