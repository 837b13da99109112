use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::status::{GameStatus, InvalidTransition, SessionEvent};

/// Backing data source strategy for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Wikipedia category membership via the PetScan API.
    Petscan,
    /// Pre-indexed offline answer dataset.
    Offline,
    /// Reserved; not implemented.
    Wikipedia,
}

/// Immutable category reference data, loaded once per process from the
/// category dataset. Field names keep the dataset's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable identifier inside the dataset.
    pub id: u32,
    /// Human readable category name.
    pub name: String,
    /// Query key passed to the verification sources.
    pub search_word: String,
    /// Short machine key used for statistics and settings.
    pub key: String,
    /// Which source answers verification requests for this category.
    pub search_provider: SearchProvider,
    /// Extra valid terms merged into the candidate list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Vec<String>>,
    /// Letter attached when the category is handed out for a round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<char>,
}

/// Player info tracked during a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Unique player identifier.
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

impl Player {
    /// Build a fresh player with zeroed scores and a generated identifier.
    pub fn new(name: String, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            total_score: 0,
            current_round_score: 0,
            current_round_answer: None,
            has_submitted: false,
            avatar,
        }
    }
}

/// Result of one player for one completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerResult {
    /// Identifier of the player.
    pub player_id: Uuid,
    /// Display name at the time the round completed.
    pub player_name: String,
    /// Answer submitted that round (empty if none).
    pub answer: String,
    /// Score earned that round.
    pub score: u32,
}

/// Append-only record of one completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundHistoryEntry {
    /// 1-based round number.
    pub round_number: u32,
    /// Category name played that round.
    pub category: String,
    /// Letter played that round.
    pub letter: char,
    /// When the round was closed.
    pub timestamp: SystemTime,
    /// One result per roster member, in roster order.
    pub player_results: Vec<PlayerResult>,
}

/// Audit record of a single verified submission (legacy single-player
/// attempt shape, kept as the statistics feed).
#[derive(Debug, Clone, PartialEq)]
pub struct GameAttempt {
    /// The submitted term.
    pub term: String,
    /// Whether verification accepted it.
    pub found: bool,
    /// When the attempt was checked.
    pub timestamp: SystemTime,
}

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session reached a terminal state and can no longer be mutated.
    #[error("session is {0:?}; the operation requires an active session")]
    NotActive(GameStatus),
    /// The player is not part of this session's roster.
    #[error("unknown player `{0}`")]
    UnknownPlayer(Uuid),
    /// The player already submitted an answer this round.
    #[error("player `{0}` already submitted an answer this round")]
    AlreadySubmitted(String),
    /// The requested lifecycle transition is not valid.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// Aggregated state for an in-progress or archived game session.
///
/// The live session is exclusively owned by the shared state's session
/// slot; once archived into history it is only read, never mutated.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Primary key of the session.
    pub id: Uuid,
    /// Optional display name for the game.
    pub game_name: Option<String>,
    /// Roster keyed by player id; insertion order defines turn order.
    pub players: IndexMap<Uuid, Player>,
    /// 1-based round counter; only ever increases.
    pub current_round: u32,
    /// Category challenged in the current round.
    pub category: Category,
    /// Letter challenged in the current round (stored lowercase).
    pub letter: char,
    /// Creation timestamp.
    pub started_at: SystemTime,
    /// Set when the session reaches a terminal state.
    pub ended_at: Option<SystemTime>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// One entry per completed round, append-only.
    pub round_history: Vec<RoundHistoryEntry>,
    /// Verified submissions across all rounds, in submission order.
    pub attempts: Vec<GameAttempt>,
}

impl GameSession {
    /// Build a new in-memory session starting at round 1.
    ///
    /// The caller guarantees a non-empty roster; roster validation lives in
    /// the service layer.
    pub fn new(
        category: Category,
        letter: char,
        players: Vec<Player>,
        game_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_name,
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            current_round: 1,
            category,
            letter,
            started_at: SystemTime::now(),
            ended_at: None,
            status: GameStatus::Active,
            round_history: Vec::new(),
            attempts: Vec::new(),
        }
    }

    /// Record a player's answer for the current round.
    ///
    /// `score` is the round score already decided by verification; the
    /// player is marked as submitted whether or not the answer was correct.
    pub fn submit_answer(
        &mut self,
        player_id: Uuid,
        answer: String,
        score: u32,
    ) -> Result<(), SessionError> {
        self.ensure_active()?;

        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(SessionError::UnknownPlayer(player_id))?;

        if player.has_submitted {
            return Err(SessionError::AlreadySubmitted(player.name.clone()));
        }

        player.current_round_answer = Some(answer);
        player.current_round_score = score;
        player.has_submitted = true;

        Ok(())
    }

    /// Append a verified submission to the attempt audit trail.
    pub fn record_attempt(&mut self, term: String, found: bool) {
        self.attempts.push(GameAttempt {
            term,
            found,
            timestamp: SystemTime::now(),
        });
    }

    /// True iff the roster is non-empty and every player submitted.
    pub fn all_players_submitted(&self) -> bool {
        !self.players.is_empty() && self.players.values().all(|p| p.has_submitted)
    }

    /// First player in roster order that has not submitted yet. `None`
    /// once everyone submitted; defines strict turn order.
    pub fn current_turn_player(&self) -> Option<&Player> {
        self.players.values().find(|p| !p.has_submitted)
    }

    /// Close the current round and open the next one with a fresh
    /// category/letter challenge.
    ///
    /// The history entry is built from the answers and round scores as they
    /// stand, then round scores are folded into totals and per-round player
    /// state is reset. Returns the new round number.
    pub fn advance_round(
        &mut self,
        next_category: Category,
        next_letter: char,
    ) -> Result<u32, SessionError> {
        self.status = self.status.apply(SessionEvent::AdvanceRound)?;

        let player_results = self
            .players
            .values()
            .map(|player| PlayerResult {
                player_id: player.id,
                player_name: player.name.clone(),
                answer: player.current_round_answer.clone().unwrap_or_default(),
                score: player.current_round_score,
            })
            .collect();

        self.round_history.push(RoundHistoryEntry {
            round_number: self.current_round,
            category: self.category.name.clone(),
            letter: self.letter,
            timestamp: SystemTime::now(),
            player_results,
        });

        for player in self.players.values_mut() {
            player.total_score += player.current_round_score;
            player.current_round_score = 0;
            player.current_round_answer = None;
            player.has_submitted = false;
        }

        self.current_round += 1;
        self.category = next_category;
        self.letter = next_letter;

        Ok(self.current_round)
    }

    /// Finish the game normally. The session becomes immutable afterwards.
    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.status = self.status.apply(SessionEvent::Complete)?;
        self.ended_at = Some(SystemTime::now());
        Ok(())
    }

    /// Give up on the game. The session becomes immutable afterwards.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        self.status = self.status.apply(SessionEvent::Abandon)?;
        self.ended_at = Some(SystemTime::now());
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::NotActive(self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category {
            id: 1,
            name: name.into(),
            search_word: name.into(),
            key: name.to_lowercase(),
            search_provider: SearchProvider::Offline,
            additional_data: None,
            letter: None,
        }
    }

    fn session_with(names: &[&str]) -> GameSession {
        let players = names
            .iter()
            .map(|name| Player::new((*name).into(), None))
            .collect();
        GameSession::new(category("Tier"), 'k', players, None)
    }

    #[test]
    fn new_session_starts_at_round_one_and_active() {
        let session = session_with(&["Ada", "Bert"]);
        assert_eq!(session.current_round, 1);
        assert_eq!(session.status, GameStatus::Active);
        assert!(session.round_history.is_empty());
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn turn_order_follows_roster_order() {
        let mut session = session_with(&["Ada", "Bert", "Cleo"]);
        let ids: Vec<Uuid> = session.players.keys().copied().collect();

        assert_eq!(session.current_turn_player().unwrap().name, "Ada");

        session.submit_answer(ids[0], "Katze".into(), 10).unwrap();
        assert_eq!(session.current_turn_player().unwrap().name, "Bert");

        session.submit_answer(ids[1], "Kuh".into(), 10).unwrap();
        session.submit_answer(ids[2], "Kamel".into(), 0).unwrap();
        assert!(session.current_turn_player().is_none());
        assert!(session.all_players_submitted());
    }

    #[test]
    fn all_players_submitted_is_false_for_empty_roster() {
        let session = GameSession::new(category("Tier"), 'k', Vec::new(), None);
        assert!(!session.all_players_submitted());
    }

    #[test]
    fn double_submission_is_rejected() {
        let mut session = session_with(&["Ada"]);
        let id = *session.players.keys().next().unwrap();

        session.submit_answer(id, "Katze".into(), 10).unwrap();
        let err = session.submit_answer(id, "Kuh".into(), 10).unwrap_err();
        assert!(matches!(err, SessionError::AlreadySubmitted(name) if name == "Ada"));
    }

    #[test]
    fn submission_for_unknown_player_is_rejected() {
        let mut session = session_with(&["Ada"]);
        let stranger = Uuid::new_v4();
        let err = session.submit_answer(stranger, "Katze".into(), 0).unwrap_err();
        assert!(matches!(err, SessionError::UnknownPlayer(id) if id == stranger));
    }

    #[test]
    fn advance_round_archives_results_and_resets_players() {
        let mut session = session_with(&["Ada", "Bert"]);
        let ids: Vec<Uuid> = session.players.keys().copied().collect();

        session.submit_answer(ids[0], "Katze".into(), 10).unwrap();
        session.submit_answer(ids[1], "Krokodil".into(), 0).unwrap();

        let next = session.advance_round(category("Stadt"), 'b').unwrap();
        assert_eq!(next, 2);
        assert_eq!(session.current_round, 2);
        assert_eq!(session.category.name, "Stadt");
        assert_eq!(session.letter, 'b');

        let entry = session.round_history.last().unwrap();
        assert_eq!(entry.round_number, 1);
        assert_eq!(entry.category, "Tier");
        assert_eq!(entry.letter, 'k');
        assert_eq!(entry.player_results.len(), 2);
        assert_eq!(entry.player_results[0].answer, "Katze");
        assert_eq!(entry.player_results[0].score, 10);

        let ada = &session.players[&ids[0]];
        assert_eq!(ada.total_score, 10);
        assert_eq!(ada.current_round_score, 0);
        assert_eq!(ada.current_round_answer, None);
        assert!(!ada.has_submitted);
    }

    #[test]
    fn completed_session_rejects_further_mutation() {
        let mut session = session_with(&["Ada"]);
        let id = *session.players.keys().next().unwrap();

        session.complete().unwrap();
        assert!(session.ended_at.is_some());

        let err = session.submit_answer(id, "Katze".into(), 10).unwrap_err();
        assert!(matches!(err, SessionError::NotActive(GameStatus::Completed)));

        let err = session.advance_round(category("Stadt"), 'b').unwrap_err();
        assert!(matches!(err, SessionError::Transition(_)));

        assert!(session.complete().is_err());
    }

    #[test]
    fn abandon_is_terminal() {
        let mut session = session_with(&["Ada"]);
        session.abandon().unwrap();
        assert_eq!(session.status, GameStatus::Abandoned);
        assert!(session.abandon().is_err());
        assert!(session.complete().is_err());
    }
}
