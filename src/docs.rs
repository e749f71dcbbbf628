// src/docs.rs

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{attempts, evaluation},
    models::{
        attempt::{PopularQuizStats, QuestionAttemptView, QuizAttemptView},
        evaluation::{EvaluateRequest, ScoreResult, SubmittedAnswer},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        evaluation::evaluate_quiz,
        attempts::get_last_attempt,
        attempts::get_recent_attempts,
        attempts::get_top_by_attempts,
        attempts::get_top_by_average,
    ),
    components(schemas(
        EvaluateRequest,
        SubmittedAnswer,
        ScoreResult,
        QuizAttemptView,
        QuestionAttemptView,
        PopularQuizStats,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Evaluation", description = "Score quiz submissions"),
        (name = "Quiz Attempts", description = "User quiz history and quiz rankings")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
