use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::dao::{
    models::{SessionEntity, SettingsEntity, StatisticsEntity},
    session_store::KeyValueStore,
    storage::{StorageError, StorageResult},
};

const SESSION_KEY: &str = "session";
const HISTORY_KEY: &str = "history";
const STATISTICS_KEY: &str = "statistics";
const SETTINGS_KEY: &str = "settings";

/// Typed repository over the key-value port for everything the game
/// persists: the live session, the archived history, statistics, and
/// settings.
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    /// Wrap a key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist the live session.
    pub async fn save_session(&self, session: &SessionEntity) -> StorageResult<()> {
        self.put(SESSION_KEY, session).await
    }

    /// Load the live session, if one was persisted.
    pub async fn load_session(&self) -> StorageResult<Option<SessionEntity>> {
        self.fetch(SESSION_KEY).await
    }

    /// Remove the live session entry.
    pub async fn clear_session(&self) -> StorageResult<()> {
        self.store.remove(SESSION_KEY).await
    }

    /// Persist the archived session history.
    pub async fn save_history(&self, history: &[SessionEntity]) -> StorageResult<()> {
        self.put(HISTORY_KEY, &history).await
    }

    /// Load the archived session history; missing history reads as empty.
    pub async fn load_history(&self) -> StorageResult<Vec<SessionEntity>> {
        Ok(self.fetch(HISTORY_KEY).await?.unwrap_or_default())
    }

    /// Persist the aggregate statistics.
    pub async fn save_statistics(&self, statistics: &StatisticsEntity) -> StorageResult<()> {
        self.put(STATISTICS_KEY, statistics).await
    }

    /// Load the aggregate statistics; missing statistics read as zeroed.
    pub async fn load_statistics(&self) -> StorageResult<StatisticsEntity> {
        Ok(self.fetch(STATISTICS_KEY).await?.unwrap_or_default())
    }

    /// Persist the user settings.
    pub async fn save_settings(&self, settings: &SettingsEntity) -> StorageResult<()> {
        self.put(SETTINGS_KEY, settings).await
    }

    /// Load the user settings; missing settings read as defaults.
    pub async fn load_settings(&self) -> StorageResult<SettingsEntity> {
        Ok(self.fetch(SETTINGS_KEY).await?.unwrap_or_default())
    }

    /// Probe the backing store.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.store.health_check().await
    }

    async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let payload = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store.set(key, payload).await
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(payload) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::session_store::memory::MemoryStore,
        state::game::{Category, GameSession, Player, SearchProvider},
    };

    fn repository() -> SessionRepository {
        SessionRepository::new(Arc::new(MemoryStore::new()))
    }

    fn entity() -> SessionEntity {
        let category = Category {
            id: 1,
            name: "Tier".into(),
            search_word: "Tiere".into(),
            key: "animals".into(),
            search_provider: SearchProvider::Offline,
            additional_data: None,
            letter: None,
        };
        GameSession::new(category, 'k', vec![Player::new("Ada".into(), None)], None).into()
    }

    #[tokio::test]
    async fn session_save_load_clear() {
        let repo = repository();
        assert_eq!(repo.load_session().await.unwrap(), None);

        let entity = entity();
        repo.save_session(&entity).await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), Some(entity));

        repo.clear_session().await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_collections_read_as_defaults() {
        let repo = repository();
        assert!(repo.load_history().await.unwrap().is_empty());
        assert_eq!(repo.load_statistics().await.unwrap(), StatisticsEntity::default());
        assert_eq!(repo.load_settings().await.unwrap(), SettingsEntity::default());
    }

    #[tokio::test]
    async fn history_round_trips() {
        let repo = repository();
        let history = vec![entity(), entity()];
        repo.save_history(&history).await.unwrap();
        assert_eq!(repo.load_history().await.unwrap(), history);
    }

    #[tokio::test]
    async fn corrupted_payload_surfaces_decode_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSION_KEY, "not json".into()).await.unwrap();

        let repo = SessionRepository::new(store);
        let err = repo.load_session().await.unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }
}
