use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Riddle Rush backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::answers::check_answer,
        crate::routes::answers::random_category,
        crate::routes::answers::list_categories,
        crate::routes::game::create_game,
        crate::routes::game::current_game,
        crate::routes::game::submit_answer,
        crate::routes::game::advance_round,
        crate::routes::game::end_game,
        crate::routes::game::abandon_game,
        crate::routes::game::leaderboard,
        crate::routes::game::game_history,
        crate::routes::game::list_players,
        crate::routes::game::add_player,
        crate::routes::game::remove_player,
        crate::routes::stats::statistics,
        crate::routes::stats::get_settings,
        crate::routes::stats::update_settings,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::answers::CheckAnswerRequest,
            crate::dto::answers::CheckAnswerResponse,
            crate::dto::answers::CategorySummary,
            crate::dto::answers::CategoryResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::PlayerInput,
            crate::dto::game::SubmitAnswerRequest,
            crate::dto::game::SubmitAnswerResponse,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::RankedPlayerSummary,
            crate::dto::game::RoundHistorySummary,
            crate::dto::game::PlayerResultSummary,
            crate::dto::stats::StatisticsResponse,
            crate::dto::stats::SettingsDto,
            crate::state::game::SearchProvider,
            crate::state::status::GameStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "answers", description = "Category dataset and answer verification"),
        (name = "game", description = "Game session lifecycle and roster"),
        (name = "stats", description = "Statistics and settings"),
    )
)]
pub struct ApiDoc;
