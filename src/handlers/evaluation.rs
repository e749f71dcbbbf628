// src/handlers/evaluation.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        evaluation::{EvaluateRequest, ScoreResult},
        user::AuthUser,
    },
    state::AppState,
};

/// Evaluates a submitted quiz for the authenticated user.
///
/// * Every submitted question is worth `maxMarks / answers.len()`.
/// * Answers are compared with the stored answer after trimming, case-sensitively.
/// * The attempt is appended to the user's history for this quiz. That write is
///   best-effort: if it fails the error is logged and the score is still returned.
#[utoipa::path(
    post,
    path = "/api/quiz/evaluate",
    tag = "Evaluation",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Quiz evaluated successfully", body = ScoreResult),
        (status = 400, description = "Empty or invalid submission"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Quiz or question not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn evaluate_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EvaluateRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let outcome = state.evaluator.evaluate(&user, &req).await?;

    if let Err(e) = &outcome.recorded {
        tracing::error!(
            "Failed to save quiz attempt for user '{}' in quiz {}: {}",
            user.username,
            req.quiz_id,
            e
        );
    }

    Ok(Json(outcome.score))
}
