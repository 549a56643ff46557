use crate::error::{LearningError, Result};
use crate::types::QuizQuestion;

/// Score of one submission against a topic's quiz bank.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
    /// `100 * correct / total`, unrounded.
    pub score_percent: f64,
    pub passed: bool,
}

impl Grade {
    pub fn rounded_score(&self) -> u32 {
        self.score_percent.round() as u32
    }
}

/// Grade `answers` positionally against `quiz`.
///
/// A missing answer (submission shorter than the bank) counts as wrong, as
/// does an option index outside the question's options. A submission longer
/// than the bank is rejected. An empty bank is an error rather than a NaN
/// score.
pub fn grade(
    topic_id: &str,
    answers: &[u32],
    quiz: &[QuizQuestion],
    required_score: u32,
) -> Result<Grade> {
    if quiz.is_empty() {
        return Err(LearningError::EmptyQuiz {
            topic_id: topic_id.to_string(),
        });
    }
    if answers.len() > quiz.len() {
        return Err(LearningError::InvalidInput(format!(
            "{} answers submitted for {} questions",
            answers.len(),
            quiz.len()
        )));
    }

    let correct = quiz
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.correct_answer == **a)
        .count();
    let total = quiz.len();
    let score_percent = 100.0 * correct as f64 / total as f64;

    Ok(Grade {
        correct,
        total,
        score_percent,
        passed: score_percent >= f64::from(required_score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(correct: &[u32]) -> Vec<QuizQuestion> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| QuizQuestion {
                id: format!("q{i}"),
                question: format!("question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: *c,
                explanation: None,
            })
            .collect()
    }

    #[test]
    fn four_of_five_passes_at_eighty() {
        let g = grade("t", &[0, 1, 2, 0, 0], &bank(&[0, 1, 2, 3, 0]), 80).unwrap();
        assert_eq!(g.correct, 4);
        assert_eq!(g.total, 5);
        assert_eq!(g.score_percent, 80.0);
        assert_eq!(g.rounded_score(), 80);
        assert!(g.passed);
    }

    #[test]
    fn one_of_five_fails() {
        let g = grade("t", &[1, 1, 1, 1, 1], &bank(&[0, 1, 2, 3, 0]), 80).unwrap();
        assert_eq!(g.correct, 1);
        assert_eq!(g.rounded_score(), 20);
        assert!(!g.passed);
    }

    #[test]
    fn empty_bank_is_an_error() {
        let err = grade("t", &[], &[], 80).unwrap_err();
        assert!(matches!(err, LearningError::EmptyQuiz { .. }));
    }

    #[test]
    fn short_submission_counts_missing_as_wrong() {
        let g = grade("t", &[0, 1], &bank(&[0, 1, 2, 3]), 80).unwrap();
        assert_eq!(g.correct, 2);
        assert_eq!(g.score_percent, 50.0);
        assert!(!g.passed);

        let none = grade("t", &[], &bank(&[0, 1]), 80).unwrap();
        assert_eq!(none.correct, 0);
        assert_eq!(none.score_percent, 0.0);
    }

    #[test]
    fn long_submission_is_rejected() {
        let err = grade("t", &[0, 0, 0], &bank(&[0, 0]), 80).unwrap_err();
        assert!(matches!(err, LearningError::InvalidInput(_)));
    }

    #[test]
    fn threshold_is_inclusive_and_configurable() {
        let quiz = bank(&[0, 0, 0]);
        // 2/3 = 66.67%
        assert!(!grade("t", &[0, 0, 1], &quiz, 67).unwrap().passed);
        assert!(grade("t", &[0, 0, 1], &quiz, 66).unwrap().passed);
        assert!(grade("t", &[1, 1, 1], &quiz, 0).unwrap().passed);
    }

    #[test]
    fn score_matches_formula_for_every_prefix() {
        let quiz = bank(&[0, 1, 2, 3, 0, 1, 2, 3]);
        let perfect: Vec<u32> = quiz.iter().map(|q| q.correct_answer).collect();
        for wrong in 0..=quiz.len() {
            let mut answers = perfect.clone();
            for a in answers.iter_mut().take(wrong) {
                *a += 1;
            }
            let g = grade("t", &answers, &quiz, 80).unwrap();
            let expected = 100.0 * (quiz.len() - wrong) as f64 / quiz.len() as f64;
            assert_eq!(g.score_percent, expected);
            assert_eq!(g.passed, expected >= 80.0);
        }
    }
}
