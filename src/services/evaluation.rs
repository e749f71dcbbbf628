// src/services/evaluation.rs

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{EvaluationError, RecordingError},
    models::{
        attempt::QuizAttempt,
        evaluation::{EvaluateRequest, ScoreResult},
        question::Question,
        user::AuthUser,
    },
    repository::QuizCatalog,
    services::{
        recorder::AttemptRecorder,
        scoring::{self, ResolvedAnswer},
    },
};

/// Score plus the outcome of the best-effort history write.
#[derive(Debug)]
pub struct EvaluationOutcome {
    pub score: ScoreResult,
    pub recorded: Result<QuizAttempt, RecordingError>,
}

/// Resolves a submission against the catalog, scores it and records it.
#[derive(Clone)]
pub struct QuizEvaluator {
    catalog: Arc<dyn QuizCatalog>,
    recorder: AttemptRecorder,
}

impl QuizEvaluator {
    pub fn new(catalog: Arc<dyn QuizCatalog>, recorder: AttemptRecorder) -> Self {
        Self { catalog, recorder }
    }

    /// Fails only when the submission cannot be scored. A failed history
    /// write is reported in [`EvaluationOutcome::recorded`] instead.
    pub async fn evaluate(
        &self,
        user: &AuthUser,
        request: &EvaluateRequest,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        if request.answers.is_empty() {
            return Err(EvaluationError::EmptySubmission);
        }

        tracing::info!(
            "Evaluating quiz {} with {} questions",
            request.quiz_id,
            request.answers.len()
        );

        let quiz = self
            .catalog
            .get_quiz(request.quiz_id)
            .await?
            .ok_or(EvaluationError::QuizNotFound(request.quiz_id))?;

        let answers = self.resolve_answers(request).await?;
        let score = scoring::evaluate(quiz.max_marks, &answers)?;

        let recorded = self.recorder.record(user, &quiz, &score, &answers).await;

        tracing::info!(
            "Quiz evaluation finished: marksGot={}, correctAnswers={}, attempted={}",
            score.marks_got,
            score.correct_answers,
            score.attempted
        );

        Ok(EvaluationOutcome { score, recorded })
    }

    async fn resolve_answers(
        &self,
        request: &EvaluateRequest,
    ) -> Result<Vec<ResolvedAnswer>, EvaluationError> {
        let mut ids: Vec<i64> = request.answers.iter().map(|a| a.question_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let questions: HashMap<i64, Question> = self
            .catalog
            .find_questions(&ids)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

        request
            .answers
            .iter()
            .map(|submitted| {
                let question = questions.get(&submitted.question_id).cloned().ok_or_else(|| {
                    tracing::warn!("Question with ID {} not found", submitted.question_id);
                    EvaluationError::QuestionNotFound(submitted.question_id)
                })?;
                Ok(ResolvedAnswer {
                    question,
                    given_answer: submitted.given_answer.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{evaluation::SubmittedAnswer, quiz::Quiz},
        repository::{AttemptHistoryStore, InMemoryAttemptStore, InMemoryCatalog},
        services::retention::HistoryRetentionPolicy,
    };
    use crate::{
        error::StoreError,
        models::attempt::{NewQuizAttempt, QuizAttemptStats},
    };
    use async_trait::async_trait;
    use sqlx::types::Json;

    /// History that reads fine but refuses every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl AttemptHistoryStore for ReadOnlyStore {
        async fn list_by_user_and_quiz(
            &self,
            _user_id: i64,
            _quiz_id: i64,
        ) -> Result<Vec<QuizAttempt>, StoreError> {
            Ok(vec![])
        }

        async fn save(&self, _attempt: NewQuizAttempt) -> Result<QuizAttempt, StoreError> {
            Err(StoreError::Unavailable("read-only replica".into()))
        }

        async fn delete(&self, _attempt: &QuizAttempt) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only replica".into()))
        }

        async fn find_last_by_user(&self, _user_id: i64) -> Result<Option<QuizAttempt>, StoreError> {
            Ok(None)
        }

        async fn list_recent_by_user(
            &self,
            _user_id: i64,
            _limit: i64,
        ) -> Result<Vec<QuizAttempt>, StoreError> {
            Ok(vec![])
        }

        async fn aggregate_by_quiz(&self) -> Result<Vec<QuizAttemptStats>, StoreError> {
            Ok(vec![])
        }
    }

    async fn catalog() -> Arc<InMemoryCatalog> {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog
            .insert_quiz(Quiz {
                id: 1,
                title: "Capitals".into(),
                description: None,
                max_marks: 10,
                active: true,
            })
            .await;
        for (id, answer) in [(11, "Paris"), (12, "4")] {
            catalog
                .insert_question(Question {
                    id,
                    quiz_id: 1,
                    content: format!("Question {id}"),
                    image: None,
                    options: Json(vec![]),
                    answer: answer.into(),
                })
                .await;
        }
        catalog
    }

    fn request(quiz_id: i64, answers: &[(i64, Option<&str>)]) -> EvaluateRequest {
        EvaluateRequest {
            quiz_id,
            answers: answers
                .iter()
                .map(|(question_id, given)| SubmittedAnswer {
                    question_id: *question_id,
                    given_answer: given.map(str::to_string),
                })
                .collect(),
        }
    }

    fn user() -> AuthUser {
        AuthUser { id: 1, username: "alice".into() }
    }

    async fn evaluator() -> (QuizEvaluator, Arc<InMemoryAttemptStore>) {
        let store = Arc::new(InMemoryAttemptStore::new());
        let recorder = AttemptRecorder::new(store.clone(), HistoryRetentionPolicy::default());
        (QuizEvaluator::new(catalog().await, recorder), store)
    }

    #[tokio::test]
    async fn evaluates_and_records() {
        let (evaluator, store) = evaluator().await;

        let outcome = evaluator
            .evaluate(&user(), &request(1, &[(11, Some("Paris")), (12, Some("5"))]))
            .await
            .unwrap();

        assert_eq!(
            outcome.score,
            ScoreResult { marks_got: 5.0, correct_answers: 1.0, attempted: 2 }
        );
        let saved = outcome.recorded.unwrap();
        assert_eq!(store.list_by_user_and_quiz(1, 1).await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let (evaluator, store) = evaluator().await;
        let err = evaluator
            .evaluate(&user(), &request(99, &[(11, Some("Paris"))]))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::QuizNotFound(99)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let (evaluator, store) = evaluator().await;
        let err = evaluator
            .evaluate(&user(), &request(1, &[(11, Some("Paris")), (404, Some("x"))]))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::QuestionNotFound(404)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_before_lookup() {
        let (evaluator, _) = evaluator().await;
        let err = evaluator.evaluate(&user(), &request(99, &[])).await.unwrap_err();
        assert!(matches!(err, EvaluationError::EmptySubmission));
    }

    #[tokio::test]
    async fn repeated_question_counts_twice() {
        let (evaluator, _) = evaluator().await;
        let outcome = evaluator
            .evaluate(&user(), &request(1, &[(11, Some("Paris")), (11, Some("Rome"))]))
            .await
            .unwrap();
        assert_eq!(outcome.score.marks_got, 5.0);
        assert_eq!(outcome.recorded.unwrap().question_attempts.len(), 2);
    }

    #[tokio::test]
    async fn score_survives_a_failed_save() {
        let recorder = AttemptRecorder::new(Arc::new(ReadOnlyStore), HistoryRetentionPolicy::default());
        let evaluator = QuizEvaluator::new(catalog().await, recorder);

        let outcome = evaluator
            .evaluate(&user(), &request(1, &[(11, Some("Paris")), (12, Some("4"))]))
            .await
            .unwrap();

        assert_eq!(
            outcome.score,
            ScoreResult { marks_got: 10.0, correct_answers: 2.0, attempted: 2 }
        );
        assert!(matches!(
            outcome.recorded,
            Err(RecordingError::Save(StoreError::Unavailable(_)))
        ));
    }
}
