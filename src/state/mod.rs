pub mod game;
pub mod status;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    dao::{
        answer_source::{offline::OfflineAnswers, petscan::PetScanClient},
        catalog::CategoryCatalog,
        session::SessionRepository,
        session_store::KeyValueStore,
    },
    state::game::{GameSession, Player},
};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the explicitly owned session context that
/// every layer receives instead of ambient globals.
pub struct AppState {
    config: AppConfig,
    catalog: CategoryCatalog,
    petscan: PetScanClient,
    offline_answers: OfflineAnswers,
    repository: SessionRepository,
    current_session: RwLock<Option<GameSession>>,
    history: RwLock<Vec<GameSession>>,
    pending_players: RwLock<Vec<Player>>,
    persistent: bool,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be
    /// cloned cheaply.
    ///
    /// `persistent` records whether the store survives restarts; a memory
    /// fallback keeps the game running but reports degraded health.
    pub fn new(
        config: AppConfig,
        catalog: CategoryCatalog,
        offline_answers: OfflineAnswers,
        petscan: PetScanClient,
        store: Arc<dyn KeyValueStore>,
        persistent: bool,
    ) -> SharedState {
        Arc::new(Self {
            config,
            catalog,
            petscan,
            offline_answers,
            repository: SessionRepository::new(store),
            current_session: RwLock::new(None),
            history: RwLock::new(Vec::new()),
            pending_players: RwLock::new(Vec::new()),
            persistent,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Category reference dataset.
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// PetScan client used by the verification service.
    pub fn petscan(&self) -> &PetScanClient {
        &self.petscan
    }

    /// Offline answer dataset used by the verification service.
    pub fn offline_answers(&self) -> &OfflineAnswers {
        &self.offline_answers
    }

    /// Typed repository over the persistence port.
    pub fn repository(&self) -> &SessionRepository {
        &self.repository
    }

    /// Slot holding the live game session, exclusively owned here.
    pub fn current_session(&self) -> &RwLock<Option<GameSession>> {
        &self.current_session
    }

    /// Archived sessions, completed or abandoned, oldest first.
    pub fn history(&self) -> &RwLock<Vec<GameSession>> {
        &self.history
    }

    /// Roster assembled before a game starts.
    pub fn pending_players(&self) -> &RwLock<Vec<Player>> {
        &self.pending_players
    }

    /// Whether the backing store survives restarts.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Restore persisted state at startup, best-effort: a failed read is
    /// logged and the server starts empty.
    pub async fn hydrate(&self) {
        match self.repository.load_session().await {
            Ok(Some(entity)) => {
                info!(session_id = %entity.id, "restored persisted game session");
                let mut slot = self.current_session.write().await;
                *slot = Some(entity.into());
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "failed to restore persisted session; starting empty");
            }
        }

        match self.repository.load_history().await {
            Ok(entities) if !entities.is_empty() => {
                info!(count = entities.len(), "restored session history");
                let mut history = self.history.write().await;
                *history = entities.into_iter().map(Into::into).collect();
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "failed to restore session history; starting empty");
            }
        }
    }
}
