//! Session store operations: the single source of truth for "is there an
//! active game, and what is its state".

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{catalog::random_letter, models::SessionEntity},
    dto::{
        game::{
            CreateGameRequest, GameSummary, PlayerInput, PlayerSummary, RankedPlayerSummary,
            SubmitAnswerRequest, SubmitAnswerResponse,
        },
        stats::{SettingsDto, StatisticsResponse},
        validation::validate_player_name,
    },
    error::ServiceError,
    services::{scoring, statistics, verification},
    state::{
        SharedState,
        game::{GameSession, Player, SessionError},
    },
};

/// Hard cap on the roster size.
pub const MAX_PLAYERS: usize = 6;
/// Round score awarded for a verified correct answer.
pub const SCORE_PER_CORRECT_ANSWER: u32 = 10;

/// Bootstrap a fresh game session.
///
/// The roster comes from the request, or from the pending roster when the
/// request carries none. Category and letter default to random picks.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let mut slot = state.current_session().write().await;
    if slot.is_some() {
        return Err(ServiceError::InvalidState(
            "a game is already active".into(),
        ));
    }

    let players = if request.players.is_empty() {
        std::mem::take(&mut *state.pending_players().write().await)
    } else {
        build_roster(request.players)?
    };

    if players.is_empty() {
        return Err(ServiceError::InvalidInput(
            "a game requires at least one player".into(),
        ));
    }

    let mut category = match request.category_id {
        Some(id) => state
            .catalog()
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("category `{id}` not found")))?,
        None => state.catalog().random().clone(),
    };
    let letter = match request.letter.as_deref() {
        Some(raw) => verification::parse_single_letter(raw)?,
        None => random_letter(),
    };
    category.letter = Some(letter);

    let session = GameSession::new(category, letter, players, request.game_name);
    info!(session_id = %session.id, round = session.current_round, "game session created");

    persist_session(state, &session).await;
    let summary = GameSummary::from(&session);
    *slot = Some(session);

    Ok(summary)
}

/// Summary of the live game session.
pub async fn current_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let slot = state.current_session().read().await;
    slot.as_ref()
        .map(GameSummary::from)
        .ok_or_else(no_active_game)
}

/// Players currently waiting on the pending roster.
pub async fn list_pending_players(state: &SharedState) -> Vec<PlayerSummary> {
    let roster = state.pending_players().read().await;
    roster.iter().map(Into::into).collect()
}

/// Add a player to the pending roster.
pub async fn add_pending_player(
    state: &SharedState,
    request: PlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let mut roster = state.pending_players().write().await;
    let player = build_player(&request.name, request.avatar, &roster)?;
    let summary = PlayerSummary::from(&player);
    roster.push(player);
    Ok(summary)
}

/// Remove a player from the pending roster. Only the pending roster can
/// shrink; a live session's roster is fixed.
pub async fn remove_pending_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let mut roster = state.pending_players().write().await;
    let before = roster.len();
    roster.retain(|player| player.id != id);

    if roster.len() == before {
        return Err(ServiceError::NotFound(format!(
            "player `{id}` is not on the pending roster"
        )));
    }
    Ok(())
}

/// Verify one player's answer and record it in the live session.
///
/// Verification suspends on network I/O, so the live session is
/// re-validated after the await: a result computed for an older round or
/// challenge is discarded instead of applied.
pub async fn submit_answer(
    state: &SharedState,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServiceError> {
    let (session_id, round, category, letter) = {
        let slot = state.current_session().read().await;
        let session = slot.as_ref().ok_or_else(no_active_game)?;

        let player = session
            .players
            .get(&request.player_id)
            .ok_or_else(|| ServiceError::from(SessionError::UnknownPlayer(request.player_id)))?;
        if player.has_submitted {
            return Err(ServiceError::InvalidState(format!(
                "player `{}` already submitted an answer this round",
                player.name
            )));
        }

        (
            session.id,
            session.current_round,
            session.category.clone(),
            session.letter,
        )
    };

    let result = verification::verify(
        state.petscan(),
        state.offline_answers(),
        state.config().offline_mode,
        &category,
        letter,
        &request.term,
    )
    .await?;
    let score = if result.found {
        scoring::calculate_score(i64::from(SCORE_PER_CORRECT_ANSWER), 0)
    } else {
        0
    };

    let mut slot = state.current_session().write().await;
    let session = slot.as_mut().ok_or_else(no_active_game)?;

    // The verification ran without the lock; make sure the result still
    // belongs to the round it was computed for.
    if session.id != session_id
        || session.current_round != round
        || session.letter != letter
        || session.category.search_word != category.search_word
    {
        return Err(ServiceError::InvalidState(
            "the round changed while the answer was being verified".into(),
        ));
    }

    session.submit_answer(request.player_id, request.term.clone(), score)?;
    session.record_attempt(request.term, result.found);

    let all_players_submitted = session.all_players_submitted();
    persist_session(state, session).await;

    Ok(SubmitAnswerResponse {
        found: result.found,
        score,
        other: result.other,
        all_players_submitted,
    })
}

/// Close the current round and open the next one with a fresh random
/// category and letter.
pub async fn advance_round(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let mut slot = state.current_session().write().await;
    let session = slot.as_mut().ok_or_else(no_active_game)?;

    let letter = random_letter();
    let mut category = state.catalog().random().clone();
    category.letter = Some(letter);

    let round = session.advance_round(category, letter)?;
    info!(session_id = %session.id, round, "round advanced");

    persist_session(state, session).await;
    Ok(GameSummary::from(&*session))
}

/// Finish the game normally: archive the session into history, fold it
/// into the statistics, and free the live slot.
pub async fn end_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let mut slot = state.current_session().write().await;
    let Some(mut session) = slot.take() else {
        return Err(no_active_game());
    };

    if let Err(err) = session.complete() {
        *slot = Some(session);
        return Err(err.into());
    }
    drop(slot);
    info!(session_id = %session.id, rounds = session.current_round, "game completed");

    let mut stats = match state.repository().load_statistics().await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(error = %err, "failed to load statistics; starting from zero");
            Default::default()
        }
    };
    statistics::fold_session(&mut stats, &session);
    if let Err(err) = state.repository().save_statistics(&stats).await {
        warn!(error = %err, "failed to persist statistics");
    }

    archive(state, session).await
}

/// Give up on the game: archived like a completed one, but without
/// touching the statistics.
pub async fn abandon_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let mut slot = state.current_session().write().await;
    let Some(mut session) = slot.take() else {
        return Err(no_active_game());
    };

    if let Err(err) = session.abandon() {
        *slot = Some(session);
        return Err(err.into());
    }
    drop(slot);
    info!(session_id = %session.id, "game abandoned");

    archive(state, session).await
}

/// Leaderboard for the live session: players with rank and winner status,
/// best first.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<RankedPlayerSummary>, ServiceError> {
    let slot = state.current_session().read().await;
    let session = slot.as_ref().ok_or_else(no_active_game)?;
    Ok(ranked_players(session))
}

/// Summaries of all archived sessions, oldest first.
pub async fn game_history(state: &SharedState) -> Vec<GameSummary> {
    let history = state.history().read().await;
    history.iter().map(Into::into).collect()
}

/// Aggregate statistics across completed games.
pub async fn statistics(state: &SharedState) -> StatisticsResponse {
    match state.repository().load_statistics().await {
        Ok(stats) => stats.into(),
        Err(err) => {
            warn!(error = %err, "failed to load statistics; reporting zeroes");
            crate::dao::models::StatisticsEntity::default().into()
        }
    }
}

/// Load the persisted user settings, defaults when absent.
pub async fn get_settings(state: &SharedState) -> SettingsDto {
    match state.repository().load_settings().await {
        Ok(settings) => settings.into(),
        Err(err) => {
            warn!(error = %err, "failed to load settings; reporting defaults");
            crate::dao::models::SettingsEntity::default().into()
        }
    }
}

/// Replace the persisted user settings, best-effort.
pub async fn update_settings(state: &SharedState, dto: SettingsDto) -> SettingsDto {
    let entity = crate::dao::models::SettingsEntity::from(dto);
    if let Err(err) = state.repository().save_settings(&entity).await {
        warn!(error = %err, "failed to persist settings");
    }
    entity.into()
}

/// Build a player from a validated name, rejecting empty, overlong, and
/// (case-insensitively) duplicate names as well as a full roster. Pure
/// construction: the caller inserts the player into the roster.
fn build_player(
    name: &str,
    avatar: Option<String>,
    roster: &[Player],
) -> Result<Player, ServiceError> {
    validate_player_name(name).map_err(|err| {
        ServiceError::InvalidInput(
            err.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid player name".into()),
        )
    })?;

    let trimmed = name.trim();
    let is_duplicate = roster
        .iter()
        .any(|player| player.name.to_lowercase() == trimmed.to_lowercase());
    if is_duplicate {
        return Err(ServiceError::InvalidInput(format!(
            "player name `{trimmed}` already exists"
        )));
    }

    if roster.len() >= MAX_PLAYERS {
        return Err(ServiceError::InvalidInput(format!(
            "a game supports at most {MAX_PLAYERS} players"
        )));
    }

    Ok(Player::new(trimmed.to_owned(), avatar))
}

fn build_roster(inputs: Vec<PlayerInput>) -> Result<Vec<Player>, ServiceError> {
    let mut roster = Vec::with_capacity(inputs.len());
    for input in inputs {
        let player = build_player(&input.name, input.avatar, &roster)?;
        roster.push(player);
    }
    Ok(roster)
}

fn ranked_players(session: &GameSession) -> Vec<RankedPlayerSummary> {
    let players: Vec<Player> = session.players.values().cloned().collect();
    let mut rows: Vec<RankedPlayerSummary> = players
        .iter()
        .map(|player| RankedPlayerSummary {
            id: player.id,
            name: player.name.clone(),
            total_score: player.total_score,
            rank: scoring::player_rank(player.id, &players).unwrap_or(players.len() + 1),
            is_winner: scoring::is_winner(player, &players),
        })
        .collect();
    rows.sort_by_key(|row| row.rank);
    rows
}

fn no_active_game() -> ServiceError {
    ServiceError::NotFound("no active game".into())
}

async fn persist_session(state: &SharedState, session: &GameSession) {
    let entity = SessionEntity::from(session.clone());
    if let Err(err) = state.repository().save_session(&entity).await {
        warn!(error = %err, "failed to persist game session; continuing in-memory");
    }
}

async fn archive(state: &SharedState, session: GameSession) -> Result<GameSummary, ServiceError> {
    let summary = {
        let mut history = state.history().write().await;
        history.push(session);
        let entities: Vec<SessionEntity> =
            history.iter().map(|s| SessionEntity::from(s.clone())).collect();
        if let Err(err) = state.repository().save_history(&entities).await {
            warn!(error = %err, "failed to persist session history");
        }
        GameSummary::from(history.last().expect("session was just pushed"))
    };

    if let Err(err) = state.repository().clear_session().await {
        warn!(error = %err, "failed to clear persisted session");
    }

    Ok(summary)
}
