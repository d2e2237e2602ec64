use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ReminderCache, StoreError};
use crate::reminder::config::PartialReminderConfig;

/// Reminder preferences stored as one JSON file per user under a cache
/// directory (`reminder_<user id>.json`).
pub struct FileCache {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCache {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user_id: Uuid) -> PathBuf {
        self.dir.join(format!("reminder_{}.json", user_id))
    }
}

#[async_trait]
impl ReminderCache for FileCache {
    async fn load(&self, user_id: Uuid) -> Result<PartialReminderConfig, StoreError> {
        match tokio::fs::read(self.path_for(user_id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PartialReminderConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, user_id: Uuid, config: &PartialReminderConfig) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(config)?;
        let path = self.path_for(user_id);
        let tmp = path.with_extension("json.tmp");

        // Readers only ever see a complete file
        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(user_id = %user_id, path = %path.display(), "Reminder preferences cached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::config::Frequency;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path()).await.unwrap();

        let loaded = cache.load(Uuid::new_v4()).await.unwrap();
        assert_eq!(loaded, PartialReminderConfig::default());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path().join("nested")).await.unwrap();
        let user = Uuid::new_v4();
        let config = PartialReminderConfig {
            email: Some("a@x.com".into()),
            trigger_at: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(8, 30, 0),
            frequency: Some(Frequency::Daily),
        };

        cache.store(user, &config).await.unwrap();

        assert_eq!(cache.load(user).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_entries_are_namespaced_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path()).await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let prefs = PartialReminderConfig {
            email: Some("alice@x.com".into()),
            ..Default::default()
        };
        cache.store(alice, &prefs).await.unwrap();

        assert_eq!(cache.load(bob).await.unwrap(), PartialReminderConfig::default());
        assert_eq!(cache.load(alice).await.unwrap().email.as_deref(), Some("alice@x.com"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path()).await.unwrap();
        let user = Uuid::new_v4();
        tokio::fs::write(cache.path_for(user), b"{not json").await.unwrap();

        assert!(matches!(cache.load(user).await, Err(StoreError::Encoding(_))));
    }
}
