// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,

    /// Total marks shared uniformly across the submitted questions.
    pub max_marks: i32,

    pub active: bool,
}
