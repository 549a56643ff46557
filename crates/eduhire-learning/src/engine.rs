use std::sync::Arc;

use eduhire_core::config::LearningConfig;
use eduhire_core::types::now_rfc3339;
use eduhire_users::UserStore;
use tracing::{info, instrument};

use crate::catalog::CourseCatalog;
use crate::error::{LearningError, Result};
use crate::types::{CourseCompletion, QuizOutcome, TopicCompletion};
use crate::{attempts, completion, grader, modality};

/// Score assumed when a course completion does not report one.
pub const DEFAULT_COMPLETION_SCORE: u32 = 100;

/// Ties the catalog to the user ledger.
///
/// Each operation is one request: it reads the course, then applies at most
/// one atomic user-document update through `UserStore::modify`.
pub struct LearningEngine {
    users: Arc<UserStore>,
    catalog: CourseCatalog,
    config: LearningConfig,
}

impl LearningEngine {
    pub fn new(users: Arc<UserStore>, catalog: CourseCatalog, config: LearningConfig) -> Self {
        Self {
            users,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// Grade a quiz. On failure pick the next teaching style and record the
    /// failed attempt before returning.
    #[instrument(skip(self, answers))]
    pub fn submit_quiz(
        &self,
        user_id: &str,
        course_id: &str,
        topic_id: &str,
        answers: &[u32],
        current_style: Option<&str>,
    ) -> Result<QuizOutcome> {
        let course = self.catalog.require(course_id)?;
        let topic = course
            .topic(topic_id)
            .ok_or_else(|| LearningError::TopicNotFound {
                course_id: course_id.to_string(),
                topic_id: topic_id.to_string(),
            })?;

        let grade = grader::grade(topic_id, answers, &topic.quizzes, course.required_score)?;

        if grade.passed {
            let user = self.users.require(user_id)?;
            return Ok(QuizOutcome {
                passed: true,
                score: grade.rounded_score(),
                score_percent: grade.score_percent,
                correct: grade.correct,
                total: grade.total,
                next_video_style: None,
                next_video: None,
                attempts: attempts::failures(&user, course_id, topic_id),
                message: "Congratulations! You passed!".to_string(),
            });
        }

        let next = modality::next_style(modality::parse_current(current_style));
        let failures = attempts::commit_failure(&self.users, user_id, course_id, topic_id)?;
        info!(
            score = grade.score_percent,
            next_style = %next,
            failures,
            "quiz failed; switching teaching style"
        );

        Ok(QuizOutcome {
            passed: false,
            score: grade.rounded_score(),
            score_percent: grade.score_percent,
            correct: grade.correct,
            total: grade.total,
            next_video_style: Some(next),
            next_video: topic.video_for(next).cloned(),
            attempts: failures,
            message: format!("Let's try a different teaching style! ({next})"),
        })
    }

    /// Mark a topic complete. Repeat completions succeed without a second
    /// reward.
    #[instrument(skip(self))]
    pub fn complete_topic(
        &self,
        user_id: &str,
        course_id: &str,
        topic_id: &str,
    ) -> Result<TopicCompletion> {
        self.catalog.topic(course_id, topic_id)?;

        let reward = self.config.topic_reward_coins;
        let now = now_rfc3339();
        let done = self.users.modify(user_id, |u| {
            Ok::<_, LearningError>(completion::record_topic(
                u, course_id, topic_id, reward, &now,
            ))
        })?;

        if done.newly_completed {
            info!(coins = done.coins_earned, "topic completed");
        } else {
            tracing::debug!("topic already completed; no reward");
        }
        Ok(done)
    }

    /// Complete a whole course: completion record, skill upgrade and coin
    /// grant are committed together. A second completion is a conflict and
    /// changes nothing.
    #[instrument(skip(self))]
    pub fn complete_course(
        &self,
        user_id: &str,
        course_id: &str,
        score: Option<u32>,
    ) -> Result<CourseCompletion> {
        let score = score.unwrap_or(DEFAULT_COMPLETION_SCORE);
        if score > 100 {
            return Err(LearningError::InvalidInput(format!(
                "score {score} exceeds 100"
            )));
        }
        let course = self.catalog.require(course_id)?;

        let now = now_rfc3339();
        let done = self
            .users
            .modify(user_id, |u| completion::record_course(u, &course, score, &now))?;

        info!(
            skill = %done.skill,
            level = done.skill_level,
            coins = done.coins_earned,
            "course completed"
        );
        Ok(done)
    }

    /// Failed attempts recorded for a topic.
    pub fn attempts(&self, user_id: &str, course_id: &str, topic_id: &str) -> Result<u32> {
        let user = self.users.require(user_id)?;
        Ok(attempts::failures(&user, course_id, topic_id))
    }
}
