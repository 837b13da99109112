//! DTOs for aggregate statistics and user settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dao::models::{SettingsEntity, StatisticsEntity},
    dto::format_system_time,
};

/// Aggregate statistics across completed games.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsResponse {
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
    /// Average winning score per completed game.
    pub average_score: f64,
    /// Total play time of completed games, in milliseconds.
    pub total_play_time_ms: u64,
    /// Completed games per category key.
    pub categories_played: HashMap<String, u32>,
    /// RFC3339 timestamp of the last completed game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
    /// Consecutive completed games with at least one correct answer.
    pub streak_current: u32,
    /// Best streak seen so far.
    pub streak_best: u32,
}

impl From<StatisticsEntity> for StatisticsResponse {
    fn from(stats: StatisticsEntity) -> Self {
        Self {
            total_games: stats.total_games,
            total_attempts: stats.total_attempts,
            correct_attempts: stats.correct_attempts,
            total_score: stats.total_score,
            best_score: stats.best_score,
            average_score: stats.average_score,
            total_play_time_ms: stats.total_play_time_ms,
            categories_played: stats.categories_played,
            last_played: stats.last_played.map(format_system_time),
            streak_current: stats.streak_current,
            streak_best: stats.streak_best,
        }
    }
}

/// User-facing settings, stored through the persistence port.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsDto {
    /// Category keys the player wants in the rotation.
    pub enabled_categories: Vec<String>,
    /// Whether sound effects are enabled.
    pub sound_enabled: bool,
}

impl From<SettingsEntity> for SettingsDto {
    fn from(settings: SettingsEntity) -> Self {
        Self {
            enabled_categories: settings.enabled_categories,
            sound_enabled: settings.sound_enabled,
        }
    }
}

impl From<SettingsDto> for SettingsEntity {
    fn from(dto: SettingsDto) -> Self {
        Self {
            enabled_categories: dto.enabled_categories,
            sound_enabled: dto.sound_enabled,
        }
    }
}
