use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::answers::{CategoryResponse, CategorySummary, CheckAnswerRequest, CheckAnswerResponse},
    error::AppError,
    services::verification,
    state::SharedState,
};

/// Routes serving the category dataset and the answer-check contract.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/check-answer", post(check_answer))
        .route("/category", get(random_category))
        .route("/categories", get(list_categories))
}

/// Verify a submitted term against a category word list.
#[utoipa::path(
    post,
    path = "/check-answer",
    tag = "answers",
    request_body = CheckAnswerRequest,
    responses(
        (status = 200, description = "Verification result", body = CheckAnswerResponse),
        (status = 400, description = "Missing or empty field"),
        (status = 404, description = "Unknown search word"),
        (status = 501, description = "Unsupported search provider")
    )
)]
pub async fn check_answer(
    State(state): State<SharedState>,
    Json(payload): Json<CheckAnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, AppError> {
    let result = verification::check_answer(&state, payload).await?;
    Ok(Json(result))
}

/// Draw a random category together with a random letter.
#[utoipa::path(
    get,
    path = "/category",
    tag = "answers",
    responses((status = 200, description = "Random category and letter", body = CategoryResponse))
)]
pub async fn random_category(State(state): State<SharedState>) -> Json<CategoryResponse> {
    Json(verification::random_category(&state).await)
}

/// List every category in the dataset.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "answers",
    responses((status = 200, description = "All categories", body = [CategorySummary]))
)]
pub async fn list_categories(State(state): State<SharedState>) -> Json<Vec<CategorySummary>> {
    Json(verification::list_categories(&state).await)
}
