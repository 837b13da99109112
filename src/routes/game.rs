use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{
        CreateGameRequest, GameSummary, PlayerInput, PlayerSummary, RankedPlayerSummary,
        SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes driving the game session lifecycle and the pending roster.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/current", get(current_game))
        .route("/games/current/answers", post(submit_answer))
        .route("/games/current/round", post(advance_round))
        .route("/games/current/end", post(end_game))
        .route("/games/current/abandon", post(abandon_game))
        .route("/games/current/leaderboard", get(leaderboard))
        .route("/games/history", get(game_history))
        .route("/players", get(list_players).post(add_player))
        .route("/players/{id}", delete(remove_player))
}

/// Create a fresh game session from the given or pending roster.
#[utoipa::path(
    post,
    path = "/games",
    tag = "game",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSummary),
        (status = 400, description = "Invalid roster or letter"),
        (status = 409, description = "A game is already active")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    payload.validate()?;
    let summary = session_service::create_game(&state, payload).await?;
    Ok(Json(summary))
}

/// Summary of the live game session.
#[utoipa::path(
    get,
    path = "/games/current",
    tag = "game",
    responses(
        (status = 200, description = "Live game", body = GameSummary),
        (status = 404, description = "No active game")
    )
)]
pub async fn current_game(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::current_game(&state).await?))
}

/// Submit one player's answer for the current round.
#[utoipa::path(
    post,
    path = "/games/current/answers",
    tag = "game",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer verified and recorded", body = SubmitAnswerResponse),
        (status = 404, description = "No active game or unknown player"),
        (status = 409, description = "Already submitted or round changed")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let response = session_service::submit_answer(&state, payload).await?;
    Ok(Json(response))
}

/// Close the current round and open the next one.
#[utoipa::path(
    post,
    path = "/games/current/round",
    tag = "game",
    responses(
        (status = 200, description = "Round advanced", body = GameSummary),
        (status = 404, description = "No active game")
    )
)]
pub async fn advance_round(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::advance_round(&state).await?))
}

/// Finish the game and archive it into history.
#[utoipa::path(
    post,
    path = "/games/current/end",
    tag = "game",
    responses(
        (status = 200, description = "Game completed", body = GameSummary),
        (status = 404, description = "No active game")
    )
)]
pub async fn end_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::end_game(&state).await?))
}

/// Abandon the game without finishing it.
#[utoipa::path(
    post,
    path = "/games/current/abandon",
    tag = "game",
    responses(
        (status = 200, description = "Game abandoned", body = GameSummary),
        (status = 404, description = "No active game")
    )
)]
pub async fn abandon_game(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::abandon_game(&state).await?))
}

/// Leaderboard of the live session, best player first.
#[utoipa::path(
    get,
    path = "/games/current/leaderboard",
    tag = "game",
    responses(
        (status = 200, description = "Ranked players", body = [RankedPlayerSummary]),
        (status = 404, description = "No active game")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RankedPlayerSummary>>, AppError> {
    Ok(Json(session_service::leaderboard(&state).await?))
}

/// Archived sessions, oldest first.
#[utoipa::path(
    get,
    path = "/games/history",
    tag = "game",
    responses((status = 200, description = "Archived games", body = [GameSummary]))
)]
pub async fn game_history(State(state): State<SharedState>) -> Json<Vec<GameSummary>> {
    Json(session_service::game_history(&state).await)
}

/// Players currently on the pending roster.
#[utoipa::path(
    get,
    path = "/players",
    tag = "game",
    responses((status = 200, description = "Pending roster", body = [PlayerSummary]))
)]
pub async fn list_players(State(state): State<SharedState>) -> Json<Vec<PlayerSummary>> {
    Json(session_service::list_pending_players(&state).await)
}

/// Add a player to the pending roster.
#[utoipa::path(
    post,
    path = "/players",
    tag = "game",
    request_body = PlayerInput,
    responses(
        (status = 200, description = "Player added", body = PlayerSummary),
        (status = 400, description = "Invalid or duplicate name, or roster full")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Json(payload): Json<PlayerInput>,
) -> Result<Json<PlayerSummary>, AppError> {
    payload.validate()?;
    Ok(Json(session_service::add_pending_player(&state, payload).await?))
}

/// Remove a player from the pending roster.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the player to remove")),
    responses(
        (status = 204, description = "Player removed"),
        (status = 404, description = "Player is not on the pending roster")
    )
)]
pub async fn remove_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session_service::remove_pending_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
