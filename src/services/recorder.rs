// src/services/recorder.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::RecordingError,
    models::{
        attempt::{NewQuestionAttempt, NewQuizAttempt, QuizAttempt},
        evaluation::ScoreResult,
        quiz::Quiz,
        user::AuthUser,
    },
    repository::AttemptHistoryStore,
    services::{retention::HistoryRetentionPolicy, scoring::ResolvedAnswer},
};

/// Persists one evaluation as an attempt, evicting old history first.
///
/// Eviction and insert are separate store calls: two concurrent recordings
/// for the same (user, quiz) may briefly leave `cap + 1` attempts.
#[derive(Clone)]
pub struct AttemptRecorder {
    store: Arc<dyn AttemptHistoryStore>,
    policy: HistoryRetentionPolicy,
}

impl AttemptRecorder {
    pub fn new(store: Arc<dyn AttemptHistoryStore>, policy: HistoryRetentionPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn record(
        &self,
        user: &AuthUser,
        quiz: &Quiz,
        score: &ScoreResult,
        answers: &[ResolvedAnswer],
    ) -> Result<QuizAttempt, RecordingError> {
        tracing::info!(
            "Saving quiz attempt for user '{}' in quiz '{}'",
            user.username,
            quiz.title
        );

        let mut existing = self
            .store
            .list_by_user_and_quiz(user.id, quiz.id)
            .await
            .map_err(RecordingError::Fetch)?;

        for oldest in self.policy.enforce_cap(&mut existing) {
            self.store
                .delete(&oldest)
                .await
                .map_err(|source| RecordingError::Evict {
                    attempt_id: oldest.id,
                    source,
                })?;
            tracing::debug!(
                "Deleted oldest quiz attempt (ID: {}) to keep at most {} history entries",
                oldest.id,
                self.policy.cap()
            );
        }

        let question_attempts = answers
            .iter()
            .map(|answer| NewQuestionAttempt {
                question_id: answer.question.id,
                quiz_id: quiz.id,
                given_answer: answer.given_answer.clone(),
                correct: answer.is_correct(),
            })
            .collect();

        let attempt = NewQuizAttempt {
            quiz_id: quiz.id,
            user_id: user.id,
            marks_got: score.marks_got,
            correct_answers: score.correct_answers,
            attempted: score.attempted,
            attempt_date: Utc::now(),
            question_attempts,
        };

        let saved = self.store.save(attempt).await.map_err(RecordingError::Save)?;
        tracing::debug!(
            "Quiz attempt {} saved for user '{}'",
            saved.id,
            user.username
        );

        Ok(saved)
    }
}
