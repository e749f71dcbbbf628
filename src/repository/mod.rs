// src/repository/mod.rs

//! Storage seams used by the services.
//!
//! Each trait has a Postgres implementation backed by `sqlx` and an
//! in-memory implementation used by tests and local tooling.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::StoreError,
    models::{
        attempt::{NewQuizAttempt, QuizAttempt, QuizAttemptStats},
        question::Question,
        quiz::Quiz,
        user::AuthUser,
    },
};

pub use memory::{InMemoryAttemptStore, InMemoryCatalog};
pub use postgres::{PgAttemptStore, PgCatalog};

/// Append-only store of quiz attempts, keyed by (user, quiz).
///
/// Every ordered read breaks ties on `attempt_date` by ascending id.
#[async_trait]
pub trait AttemptHistoryStore: Send + Sync {
    /// All attempts of `user_id` on `quiz_id`, oldest first.
    async fn list_by_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError>;

    /// Persists the attempt and its question records, assigning ids.
    async fn save(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, StoreError>;

    /// Removes the attempt together with its question records.
    async fn delete(&self, attempt: &QuizAttempt) -> Result<(), StoreError>;

    /// The attempt with the latest `attempt_date` for `user_id`, across quizzes.
    async fn find_last_by_user(&self, user_id: i64) -> Result<Option<QuizAttempt>, StoreError>;

    /// Up to `limit` attempts of `user_id`, newest first.
    async fn list_recent_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError>;

    /// Attempt count and average marks per quiz, over all users.
    async fn aggregate_by_quiz(&self) -> Result<Vec<QuizAttemptStats>, StoreError>;
}

/// Read access to quizzes and questions owned by the CRUD side of the portal.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError>;

    /// Returns the questions that exist among `ids`, in no particular order.
    async fn find_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<AuthUser>, StoreError>;
}
