// src/handlers/attempts.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    models::{
        attempt::{PopularQuizStats, QuizAttemptView},
        user::AuthUser,
    },
    state::AppState,
};

/// Get the most recent quiz attempt of a user.
///
/// Returns 204 when the user exists but has no attempts, 404 when the user is unknown.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/last/{user_id}",
    tag = "Quiz Attempts",
    params(("user_id" = i64, Path, description = "User whose last attempt is requested")),
    responses(
        (status = 200, description = "Last quiz attempt", body = QuizAttemptView),
        (status = 204, description = "No quiz attempts found for the user"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_last_attempt(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    if state.users.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let response = match state.queries.last_attempt(user_id).await? {
        Some(attempt) => Json(attempt).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

/// List the caller's most recent attempts (newest first, at most 10).
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/recent",
    tag = "Quiz Attempts",
    responses(
        (status = 200, description = "Recent quiz attempts", body = [QuizAttemptView]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recent_attempts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = state.queries.recent_attempts(user.id).await?;
    Ok(Json(attempts))
}

/// Quizzes ordered by total attempts, most attempted first.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/top-attempts",
    tag = "Quiz Attempts",
    responses((status = 200, description = "Quizzes with most attempts", body = [PopularQuizStats]))
)]
pub async fn get_top_by_attempts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.queries.top_quizzes_by_attempts().await?;
    Ok(Json(stats))
}

/// Quizzes ordered by average marks, highest first.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/top-average",
    tag = "Quiz Attempts",
    responses((status = 200, description = "Quizzes with highest average score", body = [PopularQuizStats]))
)]
pub async fn get_top_by_average(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.queries.top_quizzes_by_average_score().await?;
    Ok(Json(stats))
}
