// src/repository/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::StoreError,
    models::{
        attempt::{NewQuizAttempt, QuestionAttemptRecord, QuizAttempt, QuizAttemptStats},
        question::Question,
        quiz::Quiz,
        user::AuthUser,
    },
};

use super::{AttemptHistoryStore, QuizCatalog, UserDirectory};

const ATTEMPT_COLUMNS: &str =
    "id, quiz_id, user_id, marks_got, correct_answers, attempted, attempt_date";

/// Attempt history stored in the `quiz_attempts` / `question_attempts` tables.
#[derive(Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the question records of `attempts` in one query and attaches them.
    async fn attach_question_attempts(
        &self,
        attempts: &mut [QuizAttempt],
    ) -> Result<(), StoreError> {
        if attempts.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = attempts.iter().map(|a| a.id).collect();

        let records = sqlx::query_as::<_, QuestionAttemptRecord>(
            r#"
            SELECT id, attempt_id, question_id, quiz_id, given_answer, correct
            FROM question_attempts
            WHERE attempt_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_attempt: HashMap<i64, Vec<QuestionAttemptRecord>> = HashMap::new();
        for record in records {
            by_attempt.entry(record.attempt_id).or_default().push(record);
        }

        for attempt in attempts.iter_mut() {
            attempt.question_attempts = by_attempt.remove(&attempt.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl AttemptHistoryStore for PgAttemptStore {
    async fn list_by_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let mut attempts = sqlx::query_as::<_, QuizAttempt>(&format!(
            r#"
            SELECT {ATTEMPT_COLUMNS}
            FROM quiz_attempts
            WHERE user_id = $1 AND quiz_id = $2
            ORDER BY attempt_date ASC, id ASC
            "#
        ))
        .bind(user_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_question_attempts(&mut attempts).await?;
        Ok(attempts)
    }

    async fn save(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, StoreError> {
        // Parent and children are written in one transaction.
        let mut tx = self.pool.begin().await?;

        let (attempt_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO quiz_attempts
                (quiz_id, user_id, marks_got, correct_answers, attempted, attempt_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(attempt.quiz_id)
        .bind(attempt.user_id)
        .bind(attempt.marks_got)
        .bind(attempt.correct_answers)
        .bind(attempt.attempted)
        .bind(attempt.attempt_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut question_attempts = Vec::with_capacity(attempt.question_attempts.len());
        for qa in attempt.question_attempts {
            let (record_id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO question_attempts
                    (attempt_id, question_id, quiz_id, given_answer, correct)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(attempt_id)
            .bind(qa.question_id)
            .bind(qa.quiz_id)
            .bind(&qa.given_answer)
            .bind(qa.correct)
            .fetch_one(&mut *tx)
            .await?;

            question_attempts.push(QuestionAttemptRecord {
                id: record_id,
                attempt_id,
                question_id: qa.question_id,
                quiz_id: qa.quiz_id,
                given_answer: qa.given_answer,
                correct: qa.correct,
            });
        }

        tx.commit().await?;

        Ok(QuizAttempt {
            id: attempt_id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            marks_got: attempt.marks_got,
            correct_answers: attempt.correct_answers,
            attempted: attempt.attempted,
            attempt_date: attempt.attempt_date,
            question_attempts,
        })
    }

    async fn delete(&self, attempt: &QuizAttempt) -> Result<(), StoreError> {
        // question_attempts rows go with it (ON DELETE CASCADE).
        sqlx::query("DELETE FROM quiz_attempts WHERE id = $1")
            .bind(attempt.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_last_by_user(&self, user_id: i64) -> Result<Option<QuizAttempt>, StoreError> {
        let mut attempts = self.list_recent_by_user(user_id, 1).await?;
        Ok(attempts.pop())
    }

    async fn list_recent_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let mut attempts = sqlx::query_as::<_, QuizAttempt>(&format!(
            r#"
            SELECT {ATTEMPT_COLUMNS}
            FROM quiz_attempts
            WHERE user_id = $1
            ORDER BY attempt_date DESC, id DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.attach_question_attempts(&mut attempts).await?;
        Ok(attempts)
    }

    async fn aggregate_by_quiz(&self) -> Result<Vec<QuizAttemptStats>, StoreError> {
        let stats = sqlx::query_as::<_, QuizAttemptStats>(
            r#"
            SELECT
                quiz_id,
                COUNT(*) AS total_attempts,
                AVG(marks_got) AS average_marks
            FROM quiz_attempts
            GROUP BY quiz_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

/// Quiz, question and user lookups against the CRUD tables.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizCatalog for PgCatalog {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, max_marks, active FROM quizzes WHERE id = $1",
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn find_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Use QueryBuilder for dynamic IN clause
        let mut query_builder = QueryBuilder::<Postgres>::new(
            "SELECT id, quiz_id, content, image, options, answer FROM questions WHERE id IN (",
        );

        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let questions = query_builder
            .build_query_as::<Question>()
            .fetch_all(&self.pool)
            .await?;

        Ok(questions)
    }
}

#[async_trait]
impl UserDirectory for PgCatalog {
    async fn find_user(&self, user_id: i64) -> Result<Option<AuthUser>, StoreError> {
        let user = sqlx::query_as::<_, AuthUser>("SELECT id, username FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
