use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{answers::CategorySummary, format_system_time, validation::validate_player_name},
    state::{
        game::{GameSession, Player, PlayerResult, RoundHistoryEntry},
        status::GameStatus,
    },
};

/// Incoming player definition for the game bootstrap or the pending roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerInput {
    /// Display name; trimmed, non-empty, at most 20 characters.
    #[validate(custom(function = validate_player_name))]
    pub name: String,
    /// Optional avatar reference.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Payload used to bootstrap a brand-new game session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Optional display name for the game.
    #[serde(default)]
    pub game_name: Option<String>,
    /// Explicit roster; when empty the pending roster is consumed instead.
    #[serde(default)]
    #[validate(nested)]
    pub players: Vec<PlayerInput>,
    /// Pin the first round to a specific category instead of a random one.
    #[serde(default)]
    pub category_id: Option<u32>,
    /// Pin the first round to a specific letter instead of a random one.
    #[serde(default)]
    pub letter: Option<String>,
}

/// Payload submitting one player's answer for the current round.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAnswerRequest {
    /// Identifier of the submitting player.
    pub player_id: Uuid,
    /// The answer term to verify.
    pub term: String,
}

/// Outcome of an answer submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitAnswerResponse {
    /// Whether verification accepted the answer.
    pub found: bool,
    /// Round score awarded for the submission.
    pub score: u32,
    /// Up to 4 alternative valid answers.
    pub other: Vec<String>,
    /// Whether every roster member has now submitted.
    pub all_players_submitted: bool,
}

/// Public projection of a player.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Score accumulated over all completed rounds.
    pub total_score: u32,
    /// Score earned in the current round.
    pub current_round_score: u32,
    /// Answer submitted in the current round, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_round_answer: Option<String>,
    /// Whether the player already submitted this round.
    pub has_submitted: bool,
    /// Optional avatar reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            total_score: player.total_score,
            current_round_score: player.current_round_score,
            current_round_answer: player.current_round_answer.clone(),
            has_submitted: player.has_submitted,
            avatar: player.avatar.clone(),
        }
    }
}

/// Leaderboard row: a player together with rank and winner status.
#[derive(Debug, Serialize, ToSchema)]
pub struct RankedPlayerSummary {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Score accumulated over all completed rounds.
    pub total_score: u32,
    /// 1-based rank by total score, ties keeping roster order.
    pub rank: usize,
    /// True only for rank 1 with a strictly positive score.
    pub is_winner: bool,
}

/// One player's result inside an archived round.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResultSummary {
    /// Identifier of the player.
    pub player_id: Uuid,
    /// Display name at the time the round completed.
    pub player_name: String,
    /// Answer submitted that round (empty if none).
    pub answer: String,
    /// Score earned that round.
    pub score: u32,
}

impl From<&PlayerResult> for PlayerResultSummary {
    fn from(result: &PlayerResult) -> Self {
        Self {
            player_id: result.player_id,
            player_name: result.player_name.clone(),
            answer: result.answer.clone(),
            score: result.score,
        }
    }
}

/// Archived round as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundHistorySummary {
    /// 1-based round number.
    pub round_number: u32,
    /// Category name played that round.
    pub category: String,
    /// Letter played that round.
    pub letter: String,
    /// RFC3339 timestamp of when the round closed.
    pub timestamp: String,
    /// One result per roster member, in roster order.
    pub player_results: Vec<PlayerResultSummary>,
}

impl From<&RoundHistoryEntry> for RoundHistorySummary {
    fn from(entry: &RoundHistoryEntry) -> Self {
        Self {
            round_number: entry.round_number,
            category: entry.category.clone(),
            letter: entry.letter.to_string(),
            timestamp: format_system_time(entry.timestamp),
            player_results: entry.player_results.iter().map(Into::into).collect(),
        }
    }
}

/// Summary returned for a live or archived game session.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Session identifier.
    pub id: String,
    /// Optional display name for the game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// 1-based round counter.
    pub current_round: u32,
    /// Category challenged in the current round.
    pub category: CategorySummary,
    /// Letter challenged in the current round.
    pub letter: String,
    /// RFC3339 creation timestamp.
    pub started_at: String,
    /// RFC3339 end timestamp, present once terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    /// Roster in turn order.
    pub players: Vec<PlayerSummary>,
    /// Next player to submit, in strict roster order; absent once every
    /// player submitted or the session is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn_player: Option<PlayerSummary>,
    /// Whether every roster member submitted this round.
    pub all_players_submitted: bool,
    /// Archived rounds, oldest first.
    pub round_history: Vec<RoundHistorySummary>,
}

impl From<&GameSession> for GameSummary {
    fn from(session: &GameSession) -> Self {
        Self {
            id: session.id.to_string(),
            game_name: session.game_name.clone(),
            status: session.status,
            current_round: session.current_round,
            category: (&session.category).into(),
            letter: session.letter.to_string(),
            started_at: format_system_time(session.started_at),
            ended_at: session.ended_at.map(format_system_time),
            players: session.players.values().map(Into::into).collect(),
            current_turn_player: session.current_turn_player().map(Into::into),
            all_players_submitted: session.all_players_submitted(),
            round_history: session.round_history.iter().map(Into::into).collect(),
        }
    }
}
