// src/models/evaluation.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One answered question in a submission.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i64,

    /// Free text; `null` or blank means the question was skipped.
    #[serde(default)]
    pub given_answer: Option<String>,
}

/// DTO for submitting a quiz for evaluation.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub quiz_id: i64,

    #[validate(length(min = 1, message = "No answers submitted"))]
    pub answers: Vec<SubmittedAnswer>,
}

/// Result of scoring one submission.
///
/// `correct_answers` is a decimal on the wire for compatibility with
/// existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub marks_got: f64,
    pub correct_answers: f64,
    pub attempted: i32,
}
