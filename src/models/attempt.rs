// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'quiz_attempts' table in the database.
///
/// Owns its question records; deleting the attempt deletes them too.
/// An attempt is never updated after it is saved.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,

    /// Sum of partial marks for the correct answers, rounded to 2 places.
    pub marks_got: f64,

    /// Stored as a decimal for schema compatibility.
    pub correct_answers: f64,

    pub attempted: i32,
    pub attempt_date: DateTime<Utc>,

    #[sqlx(skip)]
    pub question_attempts: Vec<QuestionAttemptRecord>,
}

/// Represents the 'question_attempts' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct QuestionAttemptRecord {
    pub id: i64,

    /// Owning attempt. Not serialized, so the output never loops back to the parent.
    #[serde(skip_serializing)]
    pub attempt_id: i64,

    pub question_id: i64,

    /// Same as the parent's quiz, kept on the row for direct lookups.
    pub quiz_id: i64,

    pub given_answer: Option<String>,

    /// Decided once when the attempt is recorded.
    pub correct: bool,
}

/// An attempt that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuizAttempt {
    pub quiz_id: i64,
    pub user_id: i64,
    pub marks_got: f64,
    pub correct_answers: f64,
    pub attempted: i32,
    pub attempt_date: DateTime<Utc>,
    pub question_attempts: Vec<NewQuestionAttempt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestionAttempt {
    pub question_id: i64,
    pub quiz_id: i64,
    pub given_answer: Option<String>,
    pub correct: bool,
}

/// Per-quiz aggregate over every stored attempt.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct QuizAttemptStats {
    pub quiz_id: i64,
    pub total_attempts: i64,
    pub average_marks: f64,
}

/// Leaderboard row for the top-attempts and top-average views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularQuizStats {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub total_attempts: i64,
    pub average_marks: f64,
}

/// DTO for returning a stored attempt to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptView {
    pub id: i64,
    pub marks_got: f64,
    pub correct_answers: f64,
    pub attempted: i32,
    pub attempt_date: DateTime<Utc>,
    pub questions: Vec<QuestionAttemptView>,
    pub max_marks: i32,
}

/// One answered question inside a [`QuizAttemptView`], joined with the question text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAttemptView {
    pub id: i64,
    pub content: String,
    pub given_answer: Option<String>,
    pub answer: String,
    pub image: Option<String>,
}
