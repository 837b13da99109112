use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::stats::{SettingsDto, StatisticsResponse},
    services::session_service,
    state::SharedState,
};

/// Routes exposing aggregate statistics and user settings.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/statistics", get(statistics))
        .route("/settings", get(get_settings).put(update_settings))
}

/// Aggregate statistics across completed games.
#[utoipa::path(
    get,
    path = "/statistics",
    tag = "stats",
    responses((status = 200, description = "Aggregate statistics", body = StatisticsResponse))
)]
pub async fn statistics(State(state): State<SharedState>) -> Json<StatisticsResponse> {
    Json(session_service::statistics(&state).await)
}

/// Current user settings.
#[utoipa::path(
    get,
    path = "/settings",
    tag = "stats",
    responses((status = 200, description = "User settings", body = SettingsDto))
)]
pub async fn get_settings(State(state): State<SharedState>) -> Json<SettingsDto> {
    Json(session_service::get_settings(&state).await)
}

/// Replace the user settings.
#[utoipa::path(
    put,
    path = "/settings",
    tag = "stats",
    request_body = SettingsDto,
    responses((status = 200, description = "Settings saved", body = SettingsDto))
)]
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(payload): Json<SettingsDto>,
) -> Json<SettingsDto> {
    Json(session_service::update_settings(&state, payload).await)
}
