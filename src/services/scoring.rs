// src/services/scoring.rs

//! Score computation for a submitted quiz.
//!
//! Every submitted question carries the same share of the quiz's marks
//! (`max_marks / submitted questions`). Correct answers add their share to
//! the total, which is rounded half-up to two decimals once, after summing.

use crate::{
    error::EvaluationError,
    models::{evaluation::ScoreResult, question::Question},
};

/// A submitted answer paired with the question it refers to.
#[derive(Debug, Clone)]
pub struct ResolvedAnswer {
    pub question: Question,
    pub given_answer: Option<String>,
}

impl ResolvedAnswer {
    pub fn is_correct(&self) -> bool {
        self.question.is_answered_by(self.given_answer.as_deref())
    }

    pub fn is_attempted(&self) -> bool {
        self.given_answer
            .as_deref()
            .is_some_and(|answer| !answer.trim().is_empty())
    }
}

/// Scores `answers` against a quiz worth `max_marks`.
///
/// Fails with [`EvaluationError::EmptySubmission`] when `answers` is empty.
pub fn evaluate(max_marks: i32, answers: &[ResolvedAnswer]) -> Result<ScoreResult, EvaluationError> {
    if answers.is_empty() {
        return Err(EvaluationError::EmptySubmission);
    }

    let partial_mark = f64::from(max_marks) / answers.len() as f64;

    let mut marks_got = 0.0;
    let mut correct_answers = 0.0;
    let mut attempted = 0;

    for answer in answers {
        if answer.is_correct() {
            correct_answers += 1.0;
            marks_got += partial_mark;
            tracing::debug!(
                "Question {} correct, marks awarded: {}",
                answer.question.id,
                partial_mark
            );
        }

        if answer.is_attempted() {
            attempted += 1;
        }
    }

    Ok(ScoreResult {
        marks_got: round_half_up(marks_got),
        correct_answers,
        attempted,
    })
}

/// Rounds to two decimals, halves going up (`floor(x * 100 + 0.5) / 100`).
pub fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn resolved(id: i64, answer: &str, given: Option<&str>) -> ResolvedAnswer {
        ResolvedAnswer {
            question: Question {
                id,
                quiz_id: 1,
                content: format!("Question {id}"),
                image: None,
                options: Json(vec![]),
                answer: answer.to_string(),
            },
            given_answer: given.map(str::to_string),
        }
    }

    fn capital_quiz(first: Option<&str>, second: Option<&str>) -> Vec<ResolvedAnswer> {
        vec![resolved(1, "Paris", first), resolved(2, "4", second)]
    }

    #[test]
    fn one_wrong_answer_halves_the_marks() {
        let score = evaluate(10, &capital_quiz(Some("Paris"), Some("5"))).unwrap();
        assert_eq!(
            score,
            ScoreResult { marks_got: 5.0, correct_answers: 1.0, attempted: 2 }
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let score = evaluate(10, &capital_quiz(Some("paris"), Some("4"))).unwrap();
        assert_eq!(
            score,
            ScoreResult { marks_got: 5.0, correct_answers: 1.0, attempted: 2 }
        );
    }

    #[test]
    fn blank_answers_are_not_attempted() {
        let score = evaluate(10, &capital_quiz(Some(""), Some("4"))).unwrap();
        assert_eq!(
            score,
            ScoreResult { marks_got: 5.0, correct_answers: 1.0, attempted: 1 }
        );

        let score = evaluate(10, &capital_quiz(None, Some("   "))).unwrap();
        assert_eq!(score.attempted, 0);
        assert_eq!(score.correct_answers, 0.0);
        assert_eq!(score.marks_got, 0.0);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let padded = evaluate(10, &capital_quiz(Some("  Paris  "), Some("\t4\n"))).unwrap();
        let exact = evaluate(10, &capital_quiz(Some("Paris"), Some("4"))).unwrap();
        assert_eq!(padded, exact);
        assert_eq!(padded.marks_got, 10.0);
    }

    #[test]
    fn empty_submission_is_rejected() {
        assert!(matches!(evaluate(10, &[]), Err(EvaluationError::EmptySubmission)));
    }

    #[test]
    fn marks_follow_the_uniform_partial_mark_law() {
        for total in 1..=12_i64 {
            for correct in 0..=total {
                let answers: Vec<ResolvedAnswer> = (0..total)
                    .map(|i| {
                        let given = if i < correct { "A" } else { "B" };
                        resolved(i, "A", Some(given))
                    })
                    .collect();

                let score = evaluate(10, &answers).unwrap();
                let expected = round_half_up(correct as f64 * 10.0 / total as f64);
                assert_eq!(score.marks_got, expected, "{correct}/{total}");
                assert_eq!(score.correct_answers, correct as f64);
                assert_eq!(i64::from(score.attempted), total);
            }
        }
    }

    #[test]
    fn thirds_round_once_at_the_end() {
        let answers = vec![
            resolved(1, "A", Some("A")),
            resolved(2, "A", Some("A")),
            resolved(3, "A", Some("B")),
        ];
        assert_eq!(evaluate(10, &answers).unwrap().marks_got, 6.67);

        let all_correct: Vec<_> = (1..=3).map(|i| resolved(i, "A", Some("A"))).collect();
        assert_eq!(evaluate(10, &all_correct).unwrap().marks_got, 10.0);
    }

    #[test]
    fn round_half_up_rounds_halves_upward() {
        assert_eq!(round_half_up(3.333_333), 3.33);
        assert_eq!(round_half_up(6.666_666), 6.67);
        assert_eq!(round_half_up(0.125), 0.13);
        assert_eq!(round_half_up(2.0), 2.0);
    }
}
