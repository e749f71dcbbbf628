// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Quiz this question belongs to.
    pub quiz_id: i64,

    /// The text content of the question.
    pub content: String,

    /// Optional image path shown alongside the question.
    pub image: Option<String>,

    /// List of options (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// The correct answer, compared verbatim (after trimming) with the given answer.
    pub answer: String,
}

impl Question {
    /// Whether `given` matches the stored answer.
    ///
    /// Only surrounding whitespace is ignored; case and punctuation must match.
    /// A missing answer is never correct.
    pub fn is_answered_by(&self, given: Option<&str>) -> bool {
        given.is_some_and(|g| g.trim() == self.answer.trim())
    }
}
