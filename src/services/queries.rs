// src/services/queries.rs

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    config::RECENT_ATTEMPTS_LIMIT,
    error::StoreError,
    models::{
        attempt::{PopularQuizStats, QuestionAttemptView, QuizAttempt, QuizAttemptView},
        question::Question,
        quiz::Quiz,
    },
    repository::{AttemptHistoryStore, QuizCatalog},
};

/// Read-side views over stored attempts.
#[derive(Clone)]
pub struct AttemptQueryService {
    store: Arc<dyn AttemptHistoryStore>,
    catalog: Arc<dyn QuizCatalog>,
}

impl AttemptQueryService {
    pub fn new(store: Arc<dyn AttemptHistoryStore>, catalog: Arc<dyn QuizCatalog>) -> Self {
        Self { store, catalog }
    }

    /// The most recent attempt of `user_id`, or `None` when there is none.
    ///
    /// Does not check that the user exists.
    pub async fn last_attempt(&self, user_id: i64) -> Result<Option<QuizAttemptView>, StoreError> {
        tracing::info!("Fetching last quiz attempt for user {}", user_id);

        let Some(attempt) = self.store.find_last_by_user(user_id).await? else {
            return Ok(None);
        };
        Ok(self.to_views(vec![attempt]).await?.pop())
    }

    /// Up to ten most recent attempts of `user_id`, newest first.
    pub async fn recent_attempts(&self, user_id: i64) -> Result<Vec<QuizAttemptView>, StoreError> {
        tracing::info!(
            "Fetching last {} quiz attempts for user {}",
            RECENT_ATTEMPTS_LIMIT,
            user_id
        );

        let attempts = self
            .store
            .list_recent_by_user(user_id, RECENT_ATTEMPTS_LIMIT)
            .await?;
        tracing::debug!("Retrieved {} quiz attempts for user {}", attempts.len(), user_id);

        self.to_views(attempts).await
    }

    /// Quizzes ranked by number of stored attempts, most attempted first.
    pub async fn top_quizzes_by_attempts(&self) -> Result<Vec<PopularQuizStats>, StoreError> {
        let mut stats = self.popular_quiz_stats().await?;
        stats.sort_by(|a, b| {
            b.total_attempts
                .cmp(&a.total_attempts)
                .then(a.quiz_id.cmp(&b.quiz_id))
        });
        Ok(stats)
    }

    /// Quizzes ranked by average marks, highest first.
    pub async fn top_quizzes_by_average_score(&self) -> Result<Vec<PopularQuizStats>, StoreError> {
        let mut stats = self.popular_quiz_stats().await?;
        stats.sort_by(|a, b| {
            b.average_marks
                .partial_cmp(&a.average_marks)
                .unwrap_or(Ordering::Equal)
                .then(a.quiz_id.cmp(&b.quiz_id))
        });
        Ok(stats)
    }

    async fn popular_quiz_stats(&self) -> Result<Vec<PopularQuizStats>, StoreError> {
        let aggregates = self.store.aggregate_by_quiz().await?;

        let mut stats = Vec::with_capacity(aggregates.len());
        for aggregate in aggregates {
            match self.catalog.get_quiz(aggregate.quiz_id).await? {
                Some(quiz) => stats.push(PopularQuizStats {
                    quiz_id: aggregate.quiz_id,
                    quiz_title: quiz.title,
                    total_attempts: aggregate.total_attempts,
                    average_marks: aggregate.average_marks,
                }),
                None => tracing::warn!(
                    "Skipping stats for quiz {}: quiz no longer exists",
                    aggregate.quiz_id
                ),
            }
        }
        Ok(stats)
    }

    /// Joins attempts with their quiz and question text.
    async fn to_views(&self, attempts: Vec<QuizAttempt>) -> Result<Vec<QuizAttemptView>, StoreError> {
        let question_ids: Vec<i64> = attempts
            .iter()
            .flat_map(|a| a.question_attempts.iter().map(|qa| qa.question_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let questions: HashMap<i64, Question> = self
            .catalog
            .find_questions(&question_ids)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

        let mut quizzes: HashMap<i64, Option<Quiz>> = HashMap::new();
        let mut views = Vec::with_capacity(attempts.len());

        for attempt in attempts {
            if !quizzes.contains_key(&attempt.quiz_id) {
                let quiz = self.catalog.get_quiz(attempt.quiz_id).await?;
                quizzes.insert(attempt.quiz_id, quiz);
            }
            let Some(Some(quiz)) = quizzes.get(&attempt.quiz_id) else {
                tracing::warn!("Attempt {} refers to missing quiz {}", attempt.id, attempt.quiz_id);
                continue;
            };

            let question_views = attempt
                .question_attempts
                .iter()
                .filter_map(|qa| {
                    questions.get(&qa.question_id).map(|q| QuestionAttemptView {
                        id: qa.id,
                        content: q.content.clone(),
                        given_answer: qa.given_answer.clone(),
                        answer: q.answer.clone(),
                        image: q.image.clone(),
                    })
                })
                .collect();

            views.push(QuizAttemptView {
                id: attempt.id,
                marks_got: attempt.marks_got,
                correct_answers: attempt.correct_answers,
                attempted: attempt.attempted,
                attempt_date: attempt.attempt_date,
                questions: question_views,
                max_marks: quiz.max_marks,
            });
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::attempt::{NewQuestionAttempt, NewQuizAttempt},
        repository::{InMemoryAttemptStore, InMemoryCatalog},
    };
    use chrono::{Duration, TimeZone, Utc};
    use sqlx::types::Json;

    struct Fixture {
        store: Arc<InMemoryAttemptStore>,
        service: AttemptQueryService,
    }

    async fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        for (id, title) in [(1, "Capitals"), (2, "Arithmetic"), (3, "Rivers")] {
            catalog
                .insert_quiz(Quiz {
                    id,
                    title: title.into(),
                    description: None,
                    max_marks: 10,
                    active: true,
                })
                .await;
        }
        catalog
            .insert_question(Question {
                id: 100,
                quiz_id: 1,
                content: "Capital of France?".into(),
                image: Some("france.png".into()),
                options: Json(vec!["Paris".into(), "Lyon".into()]),
                answer: "Paris".into(),
            })
            .await;

        let store = Arc::new(InMemoryAttemptStore::new());
        let service = AttemptQueryService::new(store.clone(), catalog);
        Fixture { store, service }
    }

    async fn seed(store: &InMemoryAttemptStore, user_id: i64, quiz_id: i64, marks: f64, minute: i64) -> QuizAttempt {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        store
            .save(NewQuizAttempt {
                quiz_id,
                user_id,
                marks_got: marks,
                correct_answers: 1.0,
                attempted: 1,
                attempt_date: base + Duration::minutes(minute),
                question_attempts: vec![NewQuestionAttempt {
                    question_id: 100,
                    quiz_id,
                    given_answer: Some("Paris".into()),
                    correct: true,
                }],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn last_attempt_is_the_latest_by_date() {
        let f = fixture().await;
        seed(&f.store, 1, 1, 4.0, 5).await;
        let latest = seed(&f.store, 1, 2, 8.0, 30).await;
        seed(&f.store, 1, 1, 6.0, 10).await;
        seed(&f.store, 2, 1, 9.0, 60).await;

        let view = f.service.last_attempt(1).await.unwrap().unwrap();
        assert_eq!(view.id, latest.id);
        assert_eq!(view.marks_got, 8.0);
        assert_eq!(view.max_marks, 10);
        assert_eq!(view.questions.len(), 1);
        assert_eq!(view.questions[0].content, "Capital of France?");
        assert_eq!(view.questions[0].answer, "Paris");
        assert_eq!(view.questions[0].image.as_deref(), Some("france.png"));
    }

    #[tokio::test]
    async fn last_attempt_is_none_without_history() {
        let f = fixture().await;
        assert!(f.service.last_attempt(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_attempts_are_newest_first_and_limited() {
        let f = fixture().await;
        for minute in 0..12 {
            seed(&f.store, 1, 1 + minute % 2, 5.0, minute).await;
        }

        let views = f.service.recent_attempts(1).await.unwrap();
        assert_eq!(views.len(), 10);
        assert!(views.windows(2).all(|w| w[0].attempt_date > w[1].attempt_date));
    }

    #[tokio::test]
    async fn rankings_group_across_all_users() {
        let f = fixture().await;
        // quiz 1: three attempts averaging 4.0
        seed(&f.store, 1, 1, 3.0, 0).await;
        seed(&f.store, 2, 1, 4.0, 1).await;
        seed(&f.store, 3, 1, 5.0, 2).await;
        // quiz 2: one attempt of 9.5
        seed(&f.store, 1, 2, 9.5, 3).await;
        // quiz 3: two attempts averaging 7.0
        seed(&f.store, 2, 3, 6.0, 4).await;
        seed(&f.store, 2, 3, 8.0, 5).await;

        let by_attempts = f.service.top_quizzes_by_attempts().await.unwrap();
        let order: Vec<i64> = by_attempts.iter().map(|s| s.quiz_id).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert_eq!(by_attempts[0].quiz_title, "Capitals");
        assert_eq!(by_attempts[0].total_attempts, 3);
        assert_eq!(by_attempts[0].average_marks, 4.0);

        let by_average = f.service.top_quizzes_by_average_score().await.unwrap();
        let order: Vec<i64> = by_average.iter().map(|s| s.quiz_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn rankings_are_empty_without_attempts() {
        let f = fixture().await;
        assert!(f.service.top_quizzes_by_attempts().await.unwrap().is_empty());
        assert!(f.service.top_quizzes_by_average_score().await.unwrap().is_empty());
    }
}
