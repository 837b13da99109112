use std::{collections::HashMap, time::SystemTime};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{
    game::{GameAttempt, GameSession, Player, PlayerResult, RoundHistoryEntry},
    status::GameStatus,
};

pub use crate::state::game::Category;

/// Representation of a player stored in persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name chosen for the player.
    pub name: String,
    /// Score accumulated over all completed rounds.
    pub total_score: u32,
    /// Score earned in the round currently being played.
    pub current_round_score: u32,
    /// Answer submitted in the current round, if any.
    pub current_round_answer: Option<String>,
    /// Whether the player already submitted this round.
    pub has_submitted: bool,
    /// Optional avatar reference.
    pub avatar: Option<String>,
}

/// Result of one player for one archived round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerResultEntity {
    /// Identifier of the player.
    pub player_id: Uuid,
    /// Display name at the time the round completed.
    pub player_name: String,
    /// Answer submitted that round (empty if none).
    pub answer: String,
    /// Score earned that round.
    pub score: u32,
}

/// Archived record of one completed round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundHistoryEntryEntity {
    /// 1-based round number.
    pub round_number: u32,
    /// Category name played that round.
    pub category: String,
    /// Letter played that round.
    pub letter: char,
    /// When the round was closed.
    pub timestamp: SystemTime,
    /// One result per roster member, in roster order.
    pub player_results: Vec<PlayerResultEntity>,
}

/// Persisted audit record of a single verified submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameAttemptEntity {
    /// The submitted term.
    pub term: String,
    /// Whether verification accepted it.
    pub found: bool,
    /// When the attempt was checked.
    pub timestamp: SystemTime,
}

/// Representation of a game session stored in persistence and shared
/// across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Optional display name for the game.
    pub game_name: Option<String>,
    /// Roster in turn order.
    pub players: Vec<PlayerEntity>,
    /// 1-based round counter.
    pub current_round: u32,
    /// Category challenged in the current round.
    pub category: Category,
    /// Letter challenged in the current round.
    pub letter: char,
    /// Creation timestamp.
    pub started_at: SystemTime,
    /// Set once the session reached a terminal state.
    pub ended_at: Option<SystemTime>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// One entry per completed round.
    pub round_history: Vec<RoundHistoryEntryEntity>,
    /// Verified submissions across all rounds.
    #[serde(default)]
    pub attempts: Vec<GameAttemptEntity>,
}

/// Aggregate game statistics, updated whenever a game completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatisticsEntity {
    /// Number of completed games.
    pub total_games: u32,
    /// Number of verified submissions across all games.
    pub total_attempts: u32,
    /// Number of submissions verification accepted.
    pub correct_attempts: u32,
    /// Sum of the winning scores of completed games.
    pub total_score: u32,
    /// Best winning score seen so far.
    pub best_score: u32,
    /// `total_score / total_games`.
    pub average_score: f64,
    /// Total play time of completed games, in milliseconds.
    pub total_play_time_ms: u64,
    /// Completed games per category key.
    pub categories_played: HashMap<String, u32>,
    /// When the last game completed.
    pub last_played: Option<SystemTime>,
    /// Consecutive completed games with at least one correct answer.
    pub streak_current: u32,
    /// Best streak seen so far.
    pub streak_best: u32,
}

/// Persisted user-facing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsEntity {
    /// Category keys the player wants in the rotation.
    pub enabled_categories: Vec<String>,
    /// Whether sound effects are enabled.
    pub sound_enabled: bool,
}

impl Default for SettingsEntity {
    fn default() -> Self {
        Self {
            enabled_categories: Vec::new(),
            sound_enabled: true,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            total_score: value.total_score,
            current_round_score: value.current_round_score,
            current_round_answer: value.current_round_answer,
            has_submitted: value.has_submitted,
            avatar: value.avatar,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            total_score: value.total_score,
            current_round_score: value.current_round_score,
            current_round_answer: value.current_round_answer,
            has_submitted: value.has_submitted,
            avatar: value.avatar,
        }
    }
}

impl From<PlayerResultEntity> for PlayerResult {
    fn from(value: PlayerResultEntity) -> Self {
        Self {
            player_id: value.player_id,
            player_name: value.player_name,
            answer: value.answer,
            score: value.score,
        }
    }
}

impl From<PlayerResult> for PlayerResultEntity {
    fn from(value: PlayerResult) -> Self {
        Self {
            player_id: value.player_id,
            player_name: value.player_name,
            answer: value.answer,
            score: value.score,
        }
    }
}

impl From<RoundHistoryEntryEntity> for RoundHistoryEntry {
    fn from(value: RoundHistoryEntryEntity) -> Self {
        Self {
            round_number: value.round_number,
            category: value.category,
            letter: value.letter,
            timestamp: value.timestamp,
            player_results: value.player_results.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RoundHistoryEntry> for RoundHistoryEntryEntity {
    fn from(value: RoundHistoryEntry) -> Self {
        Self {
            round_number: value.round_number,
            category: value.category,
            letter: value.letter,
            timestamp: value.timestamp,
            player_results: value.player_results.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<GameAttemptEntity> for GameAttempt {
    fn from(value: GameAttemptEntity) -> Self {
        Self {
            term: value.term,
            found: value.found,
            timestamp: value.timestamp,
        }
    }
}

impl From<GameAttempt> for GameAttemptEntity {
    fn from(value: GameAttempt) -> Self {
        Self {
            term: value.term,
            found: value.found,
            timestamp: value.timestamp,
        }
    }
}

impl From<SessionEntity> for GameSession {
    fn from(value: SessionEntity) -> Self {
        Self {
            id: value.id,
            game_name: value.game_name,
            players: value
                .players
                .into_iter()
                .map(|p| (p.id, p.into()))
                .collect(),
            current_round: value.current_round,
            category: value.category,
            letter: value.letter,
            started_at: value.started_at,
            ended_at: value.ended_at,
            status: value.status,
            round_history: value.round_history.into_iter().map(Into::into).collect(),
            attempts: value.attempts.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<GameSession> for SessionEntity {
    fn from(value: GameSession) -> Self {
        Self {
            id: value.id,
            game_name: value.game_name,
            players: value
                .players
                .into_values()
                .map(Into::into)
                .collect(),
            current_round: value.current_round,
            category: value.category,
            letter: value.letter,
            started_at: value.started_at,
            ended_at: value.ended_at,
            status: value.status,
            round_history: value.round_history.into_iter().map(Into::into).collect(),
            attempts: value.attempts.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::SearchProvider;

    fn sample_session() -> GameSession {
        let players = vec![
            Player::new("Ada".into(), None),
            Player::new("Bert".into(), Some("owl".into())),
        ];
        let category = Category {
            id: 7,
            name: "Tier".into(),
            search_word: "Tiere".into(),
            key: "animals".into(),
            search_provider: SearchProvider::Offline,
            additional_data: Some(vec!["Kakadu".into()]),
            letter: None,
        };
        GameSession::new(category, 'k', players, Some("Freitagsrunde".into()))
    }

    #[test]
    fn session_round_trips_through_entity() {
        let mut session = sample_session();
        let ids: Vec<Uuid> = session.players.keys().copied().collect();
        session.submit_answer(ids[0], "Katze".into(), 10).unwrap();
        session.record_attempt("Katze".into(), true);

        let entity = SessionEntity::from(session.clone());
        let restored = GameSession::from(entity);

        assert_eq!(restored.id, session.id);
        assert_eq!(restored.letter, session.letter);
        assert_eq!(restored.status, session.status);
        assert_eq!(restored.attempts, session.attempts);
        // Roster order survives the Vec round trip.
        let restored_ids: Vec<Uuid> = restored.players.keys().copied().collect();
        assert_eq!(restored_ids, ids);
    }

    #[test]
    fn entity_json_is_stable_without_attempts_field() {
        // Older persisted sessions predate the attempts audit trail.
        let entity = SessionEntity::from(sample_session());
        let mut raw = serde_json::to_value(&entity).unwrap();
        raw.as_object_mut().unwrap().remove("attempts");

        let restored: SessionEntity = serde_json::from_value(raw).unwrap();
        assert!(restored.attempts.is_empty());
    }
}
