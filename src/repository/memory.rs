// src/repository/memory.rs

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

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

#[derive(Default)]
struct AttemptTable {
    next_attempt_id: i64,
    next_record_id: i64,
    attempts: BTreeMap<i64, QuizAttempt>,
}

/// Process-local attempt history. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryAttemptStore {
    table: RwLock<AttemptTable>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored attempts across all users and quizzes.
    pub async fn len(&self) -> usize {
        self.table.read().await.attempts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn oldest_first(a: &QuizAttempt, b: &QuizAttempt) -> std::cmp::Ordering {
    a.attempt_date.cmp(&b.attempt_date).then(a.id.cmp(&b.id))
}

#[async_trait]
impl AttemptHistoryStore for InMemoryAttemptStore {
    async fn list_by_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let table = self.table.read().await;
        let mut attempts: Vec<QuizAttempt> = table
            .attempts
            .values()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        attempts.sort_by(oldest_first);
        Ok(attempts)
    }

    async fn save(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, StoreError> {
        let mut table = self.table.write().await;

        table.next_attempt_id += 1;
        let attempt_id = table.next_attempt_id;

        let mut question_attempts = Vec::with_capacity(attempt.question_attempts.len());
        for qa in attempt.question_attempts {
            table.next_record_id += 1;
            question_attempts.push(QuestionAttemptRecord {
                id: table.next_record_id,
                attempt_id,
                question_id: qa.question_id,
                quiz_id: qa.quiz_id,
                given_answer: qa.given_answer,
                correct: qa.correct,
            });
        }

        let saved = QuizAttempt {
            id: attempt_id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            marks_got: attempt.marks_got,
            correct_answers: attempt.correct_answers,
            attempted: attempt.attempted,
            attempt_date: attempt.attempt_date,
            question_attempts,
        };
        table.attempts.insert(attempt_id, saved.clone());

        Ok(saved)
    }

    async fn delete(&self, attempt: &QuizAttempt) -> Result<(), StoreError> {
        // Question records live inside the attempt, so they go with it.
        self.table.write().await.attempts.remove(&attempt.id);
        Ok(())
    }

    async fn find_last_by_user(&self, user_id: i64) -> Result<Option<QuizAttempt>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .max_by(|a, b| oldest_first(a, b))
            .cloned())
    }

    async fn list_recent_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>, StoreError> {
        let table = self.table.read().await;
        let mut attempts: Vec<QuizAttempt> = table
            .attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| oldest_first(b, a));
        attempts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(attempts)
    }

    async fn aggregate_by_quiz(&self) -> Result<Vec<QuizAttemptStats>, StoreError> {
        let table = self.table.read().await;

        let mut totals: BTreeMap<i64, (i64, f64)> = BTreeMap::new();
        for attempt in table.attempts.values() {
            let entry = totals.entry(attempt.quiz_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += attempt.marks_got;
        }

        Ok(totals
            .into_iter()
            .map(|(quiz_id, (count, sum))| QuizAttemptStats {
                quiz_id,
                total_attempts: count,
                average_marks: sum / count as f64,
            })
            .collect())
    }
}

/// Process-local quizzes, questions and users.
#[derive(Default)]
pub struct InMemoryCatalog {
    quizzes: RwLock<HashMap<i64, Quiz>>,
    questions: RwLock<HashMap<i64, Question>>,
    users: RwLock<HashMap<i64, AuthUser>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id, quiz);
    }

    pub async fn insert_question(&self, question: Question) {
        self.questions.write().await.insert(question.id, question);
    }

    pub async fn insert_user(&self, user: AuthUser) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl QuizCatalog for InMemoryCatalog {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError> {
        Ok(self.quizzes.read().await.get(&quiz_id).cloned())
    }

    async fn find_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        let questions = self.questions.read().await;
        let mut found: Vec<Question> = ids.iter().filter_map(|id| questions.get(id).cloned()).collect();
        found.sort_by_key(|q| q.id);
        found.dedup_by_key(|q| q.id);
        Ok(found)
    }
}

#[async_trait]
impl UserDirectory for InMemoryCatalog {
    async fn find_user(&self, user_id: i64) -> Result<Option<AuthUser>, StoreError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
